//! Handlers for the `/receipts` resource.
//!
//! A receipt is registered together with all of its items or not at all.
//! Item names are resolved to food-content rows by the store; nutrition
//! values of newly seen items stay at zero.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use ledger_core::error::CoreError;
use ledger_core::types::{Amount, DbId};
use ledger_db::models::receipt::{CreateReceipt, CreateReceiptItem, FoodReceipt, ReceiptContent};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{PathParam, ValidJson};
use crate::state::AppState;

/// Request body for `POST /receipts`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReceiptRequest {
    #[validate(length(min = 1, message = "store_name is required"))]
    pub store_name: String,
    #[validate(length(min = 1, message = "food_contents must not be empty"), nested)]
    pub food_contents: Vec<ReceiptItemRequest>,
    #[validate(range(min = 1, message = "total_price must be positive"))]
    pub total_price: Amount,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ReceiptItemRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(range(min = 1, message = "price must be positive"))]
    pub price: Amount,
}

#[derive(Debug, Serialize)]
pub struct ReceiptItemResponse {
    pub id: DbId,
    pub food_content_id: DbId,
    pub name: String,
    pub price: Amount,
    pub amount: i64,
}

impl From<ReceiptContent> for ReceiptItemResponse {
    fn from(c: ReceiptContent) -> Self {
        Self {
            id: c.id,
            food_content_id: c.food_content_id,
            name: c.name,
            price: c.price,
            amount: c.amount,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReceiptResponse {
    pub id: DbId,
    pub store_name: String,
    pub total_price: Amount,
    pub items: Vec<ReceiptItemResponse>,
}

impl ReceiptResponse {
    fn new(receipt: FoodReceipt, contents: Vec<ReceiptContent>) -> Self {
        Self {
            id: receipt.id,
            store_name: receipt.store_name,
            total_price: receipt.total_price,
            items: contents.into_iter().map(Into::into).collect(),
        }
    }
}

/// POST /receipts
pub async fn create_receipt(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreateReceiptRequest>,
) -> AppResult<(StatusCode, Json<ReceiptResponse>)> {
    tracing::debug!(request = ?input, "Create receipt request");

    let created = state
        .store
        .create_receipt(&CreateReceipt {
            store_name: input.store_name,
            total_price: input.total_price,
            items: input
                .food_contents
                .into_iter()
                .map(|item| CreateReceiptItem {
                    name: item.name,
                    price: item.price,
                })
                .collect(),
        })
        .await?;

    tracing::info!(
        receipt_id = created.receipt.id,
        items = created.contents.len(),
        "Receipt registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(ReceiptResponse::new(created.receipt, created.contents)),
    ))
}

/// GET /receipts/{id}
pub async fn get_receipt(
    State(state): State<AppState>,
    PathParam(id): PathParam<DbId>,
) -> AppResult<Json<ReceiptResponse>> {
    let receipt = state
        .store
        .get_receipt(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Receipt",
            id,
        }))?;
    let contents = state.store.list_receipt_contents(id).await?;
    Ok(Json(ReceiptResponse::new(receipt, contents)))
}
