//! Route definitions for accounts and sessions.

use axum::routing::post;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Public account routes.
///
/// ```text
/// POST /users   -> create_user
/// POST /login   -> login_user
/// POST /logout  -> logout (checks its own cookie)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", post(users::create_user))
        .route("/login", post(users::login_user))
        .route("/logout", post(users::logout))
}
