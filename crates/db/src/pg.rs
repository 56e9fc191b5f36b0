//! PostgreSQL-backed [`Store`] delegating to the repositories.

use async_trait::async_trait;
use ledger_core::types::{DbId, Timestamp};
use uuid::Uuid;

use crate::models::category::Category;
use crate::models::expense::{CreateExpense, Expense, ExpenseWithStore};
use crate::models::receipt::{CreateReceipt, FoodReceipt, ReceiptContent, ReceiptWithContents};
use crate::models::session::{CreateSession, Session};
use crate::models::user::{CreateUser, User};
use crate::repositories::{CategoryRepo, ExpenseRepo, ReceiptRepo, SessionRepo, UserRepo};
use crate::store::{CredentialStore, LedgerStore, Store, StoreError};
use crate::DbPool;

/// Production store. Cheap to clone; the pool is reference counted.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn get_user(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_email(&self.pool, email).await?)
    }

    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError> {
        Ok(UserRepo::create(&self.pool, input).await?)
    }

    async fn create_session(&self, input: &CreateSession) -> Result<Session, StoreError> {
        Ok(SessionRepo::create(&self.pool, input).await?)
    }

    async fn get_session(&self, id: Uuid) -> Result<Option<Session>, StoreError> {
        Ok(SessionRepo::find_by_id(&self.pool, id).await?)
    }

    async fn update_session(&self, id: Uuid, expires_at: Timestamp) -> Result<bool, StoreError> {
        Ok(SessionRepo::update_expiry(&self.pool, id, expires_at).await?)
    }

    async fn delete_session(&self, id: Uuid) -> Result<(), StoreError> {
        let expired = SessionRepo::expire(&self.pool, id).await?;
        if !expired {
            tracing::debug!(session_id = %id, "Expire requested for unknown session");
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for PgStore {
    async fn create_category(&self, name: &str) -> Result<Category, StoreError> {
        Ok(CategoryRepo::create(&self.pool, name).await?)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(CategoryRepo::list(&self.pool).await?)
    }

    async fn create_expense(&self, input: &CreateExpense) -> Result<Expense, StoreError> {
        Ok(ExpenseRepo::create(&self.pool, input).await?)
    }

    async fn list_expenses(&self, user_id: DbId) -> Result<Vec<ExpenseWithStore>, StoreError> {
        Ok(ExpenseRepo::list_for_user(&self.pool, user_id).await?)
    }

    async fn create_receipt(
        &self,
        input: &CreateReceipt,
    ) -> Result<ReceiptWithContents, StoreError> {
        Ok(ReceiptRepo::create(&self.pool, input).await?)
    }

    async fn get_receipt(&self, id: DbId) -> Result<Option<FoodReceipt>, StoreError> {
        Ok(ReceiptRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_receipt_contents(&self, id: DbId) -> Result<Vec<ReceiptContent>, StoreError> {
        Ok(ReceiptRepo::list_contents(&self.pool, id).await?)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}
