//! User entity model and DTOs.

use ledger_core::types::{Amount, DbId, Timestamp};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    /// PHC-formatted one-way hash.
    pub password: String,
    pub email: String,
    pub age: i32,
    pub balance: Amount,
    pub password_changed_at: Timestamp,
    pub created_at: Timestamp,
}

/// DTO for creating a new user. `password` must already be hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub password: String,
    pub email: String,
    pub age: i32,
    pub balance: Amount,
}
