//! Request handlers.
//!
//! Each submodule holds the request/response types and async handler
//! functions for one resource. Handlers talk to the store through
//! [`AppState`](crate::state::AppState) and map errors via
//! [`AppError`](crate::error::AppError).

pub mod categories;
pub mod expenses;
pub mod receipts;
pub mod users;
