//! Route definitions for the `/expenses` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::expenses;
use crate::state::AppState;

/// ```text
/// GET  /expenses?user_id=N  -> list_expenses
/// POST /expenses            -> create_expense
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/expenses",
        get(expenses::list_expenses).post(expenses::create_expense),
    )
}
