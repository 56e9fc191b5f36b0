//! Handlers for the `/expenses` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use ledger_core::error::CoreError;
use ledger_core::types::{Amount, DbId, Timestamp};
use ledger_db::models::expense::{CreateExpense, Expense, ExpenseWithStore};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{ValidJson, ValidQuery};
use crate::state::AppState;

/// Request body for `POST /expenses`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateExpenseRequest {
    #[validate(range(min = 1, message = "user_id is required"))]
    pub user_id: DbId,
    #[validate(range(min = 1, message = "category_id is required"))]
    pub category_id: DbId,
    /// Negative for income.
    pub amount: Amount,
    #[validate(range(min = 1))]
    pub food_receipt_id: Option<DbId>,
    pub comment: Option<String>,
}

/// Query for `GET /expenses`.
#[derive(Debug, Deserialize, Validate)]
pub struct ListExpensesQuery {
    #[validate(range(min = 1, message = "user_id is required"))]
    pub user_id: DbId,
}

#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    pub id: DbId,
    pub user_id: DbId,
    pub category_id: DbId,
    pub amount: Amount,
    pub food_receipt_id: Option<DbId>,
    pub comment: String,
    pub created_at: Timestamp,
}

impl From<Expense> for ExpenseResponse {
    fn from(e: Expense) -> Self {
        Self {
            id: e.id,
            user_id: e.user_id,
            category_id: e.category_id,
            amount: e.amount,
            food_receipt_id: e.food_receipt_id,
            comment: e.comment.unwrap_or_default(),
            created_at: e.created_at,
        }
    }
}

/// One row of the expense history.
#[derive(Debug, Serialize)]
pub struct ExpenseListItem {
    pub id: DbId,
    pub user_id: DbId,
    pub category_id: DbId,
    pub amount: Amount,
    pub store_name: String,
    pub comment: String,
    pub created_at: Timestamp,
}

impl From<ExpenseWithStore> for ExpenseListItem {
    fn from(e: ExpenseWithStore) -> Self {
        Self {
            id: e.id,
            user_id: e.user_id,
            category_id: e.category_id,
            amount: e.amount,
            store_name: e.store_name,
            comment: e.comment.unwrap_or_default(),
            created_at: e.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExpenseListResponse {
    pub expenses: Vec<ExpenseListItem>,
}

/// POST /expenses
pub async fn create_expense(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreateExpenseRequest>,
) -> AppResult<(StatusCode, Json<ExpenseResponse>)> {
    tracing::debug!(request = ?input, "Create expense request");

    if input.amount == 0 {
        return Err(AppError::Core(CoreError::Validation(
            "amount must be non-zero".into(),
        )));
    }

    let expense = state
        .store
        .create_expense(&CreateExpense {
            user_id: input.user_id,
            category_id: input.category_id,
            amount: input.amount,
            food_receipt_id: input.food_receipt_id,
            comment: input.comment.filter(|c| !c.is_empty()),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(expense.into())))
}

/// GET /expenses?user_id=N
///
/// Oldest first. `store_name` is empty for expenses without a receipt.
pub async fn list_expenses(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<ListExpensesQuery>,
) -> AppResult<Json<ExpenseListResponse>> {
    let expenses = state.store.list_expenses(query.user_id).await?;
    Ok(Json(ExpenseListResponse {
        expenses: expenses.into_iter().map(Into::into).collect(),
    }))
}
