//! Route definitions for the `/receipts` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::receipts;
use crate::state::AppState;

/// ```text
/// POST /receipts       -> create_receipt
/// GET  /receipts/{id}  -> get_receipt
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/receipts", post(receipts::create_receipt))
        .route("/receipts/{id}", get(receipts::get_receipt))
}
