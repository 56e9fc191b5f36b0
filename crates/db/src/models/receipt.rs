//! Food receipt models.
//!
//! A receipt is a header row (`food_receipts`) plus one
//! `food_receipt_contents` row per purchased item, each pointing at a
//! `food_contents` row that carries nutrition data.

use ledger_core::types::{Amount, DbId};
use sqlx::FromRow;

/// Receipt header row.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct FoodReceipt {
    pub id: DbId,
    pub store_name: String,
    pub total_price: Amount,
}

/// A food product with its nutrition values (zero when unknown).
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct FoodContent {
    pub id: DbId,
    pub name: String,
    pub calories: f32,
    pub lipid: f32,
    pub carbohydrate: f32,
    pub protein: f32,
}

/// A receipt line item joined with its food content name.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ReceiptContent {
    pub id: DbId,
    pub food_receipt_id: DbId,
    pub food_content_id: DbId,
    pub name: String,
    pub price: Amount,
    pub amount: i64,
}

/// One purchased item in a [`CreateReceipt`].
#[derive(Debug, Clone)]
pub struct CreateReceiptItem {
    pub name: String,
    pub price: Amount,
}

/// DTO for registering a receipt together with all of its items.
#[derive(Debug, Clone)]
pub struct CreateReceipt {
    pub store_name: String,
    pub total_price: Amount,
    pub items: Vec<CreateReceiptItem>,
}

/// A freshly registered receipt and its line items.
#[derive(Debug, Clone)]
pub struct ReceiptWithContents {
    pub receipt: FoodReceipt,
    pub contents: Vec<ReceiptContent>,
}
