pub mod categories;
pub mod expenses;
pub mod health;
pub mod receipts;
pub mod users;

use axum::middleware::from_fn_with_state;
use axum::Router;

use crate::middleware::auth::require_session;
use crate::state::AppState;

/// Build the route tree.
///
/// ```text
/// /health                 service health (public)
///
/// /users                  register (public)
/// /login                  login (public)
/// /logout                 logout (public, checks its own cookie)
///
/// /expenses               list, create        (session gate)
/// /receipts               create              (session gate)
/// /receipts/{id}          get                 (session gate)
/// /categories             list, create        (session gate)
/// ```
///
/// The gate is attached with `route_layer`, so unmatched paths still 404
/// instead of being rejected for a missing cookie.
pub fn app_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .merge(expenses::router())
        .merge(receipts::router())
        .merge(categories::router())
        .route_layer(from_fn_with_state(state, require_session));

    Router::new()
        .merge(health::router())
        .merge(users::router())
        .merge(protected)
}
