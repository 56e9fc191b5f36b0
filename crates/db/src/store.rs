//! Store capabilities consumed by the HTTP layer.
//!
//! The auth core only needs [`CredentialStore`]; the expense and receipt
//! handlers need [`LedgerStore`]. [`Store`] bundles both with a health check
//! and is what the application state holds.

use async_trait::async_trait;
use ledger_core::types::{DbId, Timestamp};
use uuid::Uuid;

use crate::models::category::Category;
use crate::models::expense::{CreateExpense, Expense, ExpenseWithStore};
use crate::models::receipt::{CreateReceipt, FoodReceipt, ReceiptContent, ReceiptWithContents};
use crate::models::session::{CreateSession, Session};
use crate::models::user::{CreateUser, User};

/// Persistence failure surfaced by a store.
///
/// "Row not found" is not an error here: lookups return `Ok(None)` so callers
/// can tell a missing row apart from a malfunctioning store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    /// A unique constraint was violated. Holds the constraint name.
    #[error("Duplicate value violates unique constraint: {0}")]
    Conflict(String),

    /// A foreign key pointed at a row that does not exist.
    #[error("Referenced row does not exist: {0}")]
    InvalidReference(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.code().as_deref() {
                // PostgreSQL unique_violation
                Some("23505") => return StoreError::Conflict(constraint),
                // PostgreSQL foreign_key_violation
                Some("23503") => return StoreError::InvalidReference(constraint),
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}

/// Users and sessions.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up a user by email.
    async fn get_user(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError>;

    async fn create_session(&self, input: &CreateSession) -> Result<Session, StoreError>;

    /// Fetch a session whether or not it has expired.
    async fn get_session(&self, id: Uuid) -> Result<Option<Session>, StoreError>;

    /// Set a new expiry. Returns `false` if no such session exists.
    async fn update_session(&self, id: Uuid, expires_at: Timestamp) -> Result<bool, StoreError>;

    /// Logically delete a session by expiring it now. Unknown ids are not an error.
    async fn delete_session(&self, id: Uuid) -> Result<(), StoreError>;
}

/// Categories, expenses and receipts.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn create_category(&self, name: &str) -> Result<Category, StoreError>;

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    async fn create_expense(&self, input: &CreateExpense) -> Result<Expense, StoreError>;

    async fn list_expenses(&self, user_id: DbId) -> Result<Vec<ExpenseWithStore>, StoreError>;

    /// Register a receipt and its items atomically: either every row is
    /// written or none is.
    async fn create_receipt(&self, input: &CreateReceipt)
        -> Result<ReceiptWithContents, StoreError>;

    async fn get_receipt(&self, id: DbId) -> Result<Option<FoodReceipt>, StoreError>;

    async fn list_receipt_contents(&self, id: DbId) -> Result<Vec<ReceiptContent>, StoreError>;
}

/// Everything the application needs from persistence.
#[async_trait]
pub trait Store: CredentialStore + LedgerStore {
    async fn health_check(&self) -> Result<(), StoreError>;
}
