//! Expense entity model and DTOs.

use ledger_core::types::{Amount, DbId, Timestamp};
use sqlx::FromRow;

/// Expense row from the `expenses` table.
#[derive(Debug, Clone, FromRow)]
pub struct Expense {
    pub id: DbId,
    pub user_id: DbId,
    pub category_id: DbId,
    /// Negative for income, positive for spending.
    pub amount: Amount,
    pub food_receipt_id: Option<DbId>,
    pub comment: Option<String>,
    pub created_at: Timestamp,
}

/// An expense joined with the store name of its receipt (`""` when none).
#[derive(Debug, Clone, FromRow)]
pub struct ExpenseWithStore {
    pub id: DbId,
    pub user_id: DbId,
    pub category_id: DbId,
    pub amount: Amount,
    pub store_name: String,
    pub comment: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a new expense.
#[derive(Debug, Clone)]
pub struct CreateExpense {
    pub user_id: DbId,
    pub category_id: DbId,
    pub amount: Amount,
    pub food_receipt_id: Option<DbId>,
    pub comment: Option<String>,
}
