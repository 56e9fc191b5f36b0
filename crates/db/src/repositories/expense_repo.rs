//! Repository for the `expenses` table.

use ledger_core::types::DbId;
use sqlx::PgPool;

use crate::models::expense::{CreateExpense, Expense, ExpenseWithStore};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, category_id, amount, food_receipt_id, comment, created_at";

/// Provides create/list operations for expenses.
pub struct ExpenseRepo;

impl ExpenseRepo {
    /// Insert a new expense, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateExpense) -> Result<Expense, sqlx::Error> {
        let query = format!(
            "INSERT INTO expenses (user_id, category_id, amount, food_receipt_id, comment)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(input.user_id)
            .bind(input.category_id)
            .bind(input.amount)
            .bind(input.food_receipt_id)
            .bind(&input.comment)
            .fetch_one(pool)
            .await
    }

    /// List a user's expenses in insertion order, each with its receipt's store name.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ExpenseWithStore>, sqlx::Error> {
        sqlx::query_as::<_, ExpenseWithStore>(
            "SELECT e.id, e.user_id, e.category_id, e.amount,
                    COALESCE(r.store_name, '') AS store_name,
                    e.comment, e.created_at
             FROM expenses e
             LEFT JOIN food_receipts r ON r.id = e.food_receipt_id
             WHERE e.user_id = $1
             ORDER BY e.id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
