use ledger_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// Expense category row from the `categories` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Category {
    pub id: DbId,
    pub name: String,
}
