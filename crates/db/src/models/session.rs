//! Session model and DTOs.

use ledger_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use uuid::Uuid;

/// A session row from the `sessions` table.
///
/// `user_agent` and `client_ip` are captured at issuance and never change;
/// only `expires_at` moves (forward on renewal, to the past on logout).
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: DbId,
    pub user_agent: String,
    pub client_ip: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

/// DTO for creating a new session.
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub id: Uuid,
    pub user_id: DbId,
    pub user_agent: String,
    pub client_ip: String,
    pub expires_at: Timestamp,
}
