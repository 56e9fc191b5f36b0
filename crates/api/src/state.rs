use std::sync::Arc;

use ledger_db::Store;

use crate::auth::session::SessionManager;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). Nothing here is
/// mutated per request; all mutable state lives in the store.
#[derive(Clone)]
pub struct AppState {
    /// Users, sessions, expenses and receipts.
    pub store: Arc<dyn Store>,
    /// Session id issuance and verification.
    pub sessions: Arc<dyn SessionManager>,
    pub config: Arc<ServerConfig>,
}
