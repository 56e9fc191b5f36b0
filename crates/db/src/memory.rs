//! In-process [`Store`] for tests and local experimentation.
//!
//! Mirrors the relational schema closely enough for the HTTP layer to behave
//! identically: unique emails and category names, foreign keys on user,
//! category and receipt references, logical session deletion, and
//! all-or-nothing receipt registration. Individual operations can be made to
//! fail with [`MemoryStore::fail_on`] to exercise dependency-error paths.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use ledger_core::types::{DbId, Timestamp};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::category::Category;
use crate::models::expense::{CreateExpense, Expense, ExpenseWithStore};
use crate::models::receipt::{
    CreateReceipt, FoodContent, FoodReceipt, ReceiptContent, ReceiptWithContents,
};
use crate::models::session::{CreateSession, Session};
use crate::models::user::{CreateUser, User};
use crate::store::{CredentialStore, LedgerStore, Store, StoreError};

/// A store operation that can be forced to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetUser,
    CreateUser,
    CreateSession,
    GetSession,
    UpdateSession,
    DeleteSession,
    CreateCategory,
    ListCategories,
    CreateExpense,
    ListExpenses,
    CreateReceipt,
    /// Writing a single receipt line item, after the header was staged.
    CreateReceiptContent,
    GetReceipt,
    ListReceiptContents,
    HealthCheck,
}

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    sessions: HashMap<Uuid, Session>,
    categories: Vec<Category>,
    expenses: Vec<Expense>,
    receipts: Vec<FoodReceipt>,
    food_contents: Vec<FoodContent>,
    receipt_contents: Vec<ReceiptContent>,
    failures: HashSet<Operation>,
}

impl Tables {
    fn check(&self, op: Operation) -> Result<(), StoreError> {
        if self.failures.contains(&op) {
            return Err(StoreError::Unavailable(format!("injected failure in {op:?}")));
        }
        Ok(())
    }
}

/// Row ids start at 1 and are never reused; rows are never removed.
fn next_id(len: usize) -> DbId {
    len as DbId + 1
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call of `op` fail with [`StoreError::Unavailable`].
    pub async fn fail_on(&self, op: Operation) {
        self.tables.lock().await.failures.insert(op);
    }

    /// Undo a previous [`MemoryStore::fail_on`].
    pub async fn recover(&self, op: Operation) {
        self.tables.lock().await.failures.remove(&op);
    }

    /// Number of session rows ever issued, expired ones included.
    pub async fn session_count(&self) -> usize {
        self.tables.lock().await.sessions.len()
    }

    /// Number of receipt header rows.
    pub async fn receipt_count(&self) -> usize {
        self.tables.lock().await.receipts.len()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn get_user(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.lock().await;
        tables.check(Operation::GetUser)?;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError> {
        let mut tables = self.tables.lock().await;
        tables.check(Operation::CreateUser)?;
        if tables.users.iter().any(|u| u.email == input.email) {
            return Err(StoreError::Conflict("uq_users_email".into()));
        }

        let now = Utc::now();
        let user = User {
            id: next_id(tables.users.len()),
            name: input.name.clone(),
            password: input.password.clone(),
            email: input.email.clone(),
            age: input.age,
            balance: input.balance,
            password_changed_at: now,
            created_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn create_session(&self, input: &CreateSession) -> Result<Session, StoreError> {
        let mut tables = self.tables.lock().await;
        tables.check(Operation::CreateSession)?;
        if !tables.users.iter().any(|u| u.id == input.user_id) {
            return Err(StoreError::InvalidReference("sessions_user_id_fkey".into()));
        }
        if tables.sessions.contains_key(&input.id) {
            return Err(StoreError::Conflict("sessions_pkey".into()));
        }

        let session = Session {
            id: input.id,
            user_id: input.user_id,
            user_agent: input.user_agent.clone(),
            client_ip: input.client_ip.clone(),
            created_at: Utc::now(),
            expires_at: input.expires_at,
        };
        tables.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn get_session(&self, id: Uuid) -> Result<Option<Session>, StoreError> {
        let tables = self.tables.lock().await;
        tables.check(Operation::GetSession)?;
        Ok(tables.sessions.get(&id).cloned())
    }

    async fn update_session(&self, id: Uuid, expires_at: Timestamp) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        tables.check(Operation::UpdateSession)?;
        match tables.sessions.get_mut(&id) {
            Some(session) => {
                session.expires_at = expires_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_session(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        tables.check(Operation::DeleteSession)?;
        if let Some(session) = tables.sessions.get_mut(&id) {
            session.expires_at = Utc::now();
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn create_category(&self, name: &str) -> Result<Category, StoreError> {
        let mut tables = self.tables.lock().await;
        tables.check(Operation::CreateCategory)?;
        if tables.categories.iter().any(|c| c.name == name) {
            return Err(StoreError::Conflict("uq_categories_name".into()));
        }

        let category = Category {
            id: next_id(tables.categories.len()),
            name: name.to_string(),
        };
        tables.categories.push(category.clone());
        Ok(category)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let tables = self.tables.lock().await;
        tables.check(Operation::ListCategories)?;
        Ok(tables.categories.clone())
    }

    async fn create_expense(&self, input: &CreateExpense) -> Result<Expense, StoreError> {
        let mut tables = self.tables.lock().await;
        tables.check(Operation::CreateExpense)?;
        if !tables.users.iter().any(|u| u.id == input.user_id) {
            return Err(StoreError::InvalidReference("expenses_user_id_fkey".into()));
        }
        if !tables.categories.iter().any(|c| c.id == input.category_id) {
            return Err(StoreError::InvalidReference("expenses_category_id_fkey".into()));
        }
        if let Some(receipt_id) = input.food_receipt_id {
            if !tables.receipts.iter().any(|r| r.id == receipt_id) {
                return Err(StoreError::InvalidReference(
                    "expenses_food_receipt_id_fkey".into(),
                ));
            }
        }

        let expense = Expense {
            id: next_id(tables.expenses.len()),
            user_id: input.user_id,
            category_id: input.category_id,
            amount: input.amount,
            food_receipt_id: input.food_receipt_id,
            comment: input.comment.clone(),
            created_at: Utc::now(),
        };
        tables.expenses.push(expense.clone());
        Ok(expense)
    }

    async fn list_expenses(&self, user_id: DbId) -> Result<Vec<ExpenseWithStore>, StoreError> {
        let tables = self.tables.lock().await;
        tables.check(Operation::ListExpenses)?;

        let rows = tables
            .expenses
            .iter()
            .filter(|e| e.user_id == user_id)
            .map(|e| {
                let store_name = e
                    .food_receipt_id
                    .and_then(|rid| tables.receipts.iter().find(|r| r.id == rid))
                    .map(|r| r.store_name.clone())
                    .unwrap_or_default();
                ExpenseWithStore {
                    id: e.id,
                    user_id: e.user_id,
                    category_id: e.category_id,
                    amount: e.amount,
                    store_name,
                    comment: e.comment.clone(),
                    created_at: e.created_at,
                }
            })
            .collect();
        Ok(rows)
    }

    async fn create_receipt(
        &self,
        input: &CreateReceipt,
    ) -> Result<ReceiptWithContents, StoreError> {
        let mut tables = self.tables.lock().await;
        tables.check(Operation::CreateReceipt)?;

        // Stage everything locally; nothing reaches the tables until every
        // item has been resolved.
        let receipt = FoodReceipt {
            id: next_id(tables.receipts.len()),
            store_name: input.store_name.clone(),
            total_price: input.total_price,
        };
        let mut new_foods: Vec<FoodContent> = Vec::new();
        let mut contents: Vec<ReceiptContent> = Vec::with_capacity(input.items.len());

        for item in &input.items {
            tables.check(Operation::CreateReceiptContent)?;

            let existing = tables
                .food_contents
                .iter()
                .chain(new_foods.iter())
                .find(|f| f.name == item.name)
                .cloned();
            let food = match existing {
                Some(food) => food,
                None => {
                    let food = FoodContent {
                        id: next_id(tables.food_contents.len() + new_foods.len()),
                        name: item.name.clone(),
                        calories: 0.0,
                        lipid: 0.0,
                        carbohydrate: 0.0,
                        protein: 0.0,
                    };
                    new_foods.push(food.clone());
                    food
                }
            };

            contents.push(ReceiptContent {
                id: next_id(tables.receipt_contents.len() + contents.len()),
                food_receipt_id: receipt.id,
                food_content_id: food.id,
                name: food.name,
                price: item.price,
                amount: 1,
            });
        }

        tables.receipts.push(receipt.clone());
        tables.food_contents.extend(new_foods);
        tables.receipt_contents.extend(contents.iter().cloned());
        Ok(ReceiptWithContents { receipt, contents })
    }

    async fn get_receipt(&self, id: DbId) -> Result<Option<FoodReceipt>, StoreError> {
        let tables = self.tables.lock().await;
        tables.check(Operation::GetReceipt)?;
        Ok(tables.receipts.iter().find(|r| r.id == id).cloned())
    }

    async fn list_receipt_contents(&self, id: DbId) -> Result<Vec<ReceiptContent>, StoreError> {
        let tables = self.tables.lock().await;
        tables.check(Operation::ListReceiptContents)?;
        Ok(tables
            .receipt_contents
            .iter()
            .filter(|c| c.food_receipt_id == id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        self.tables.lock().await.check(Operation::HealthCheck)
    }
}
