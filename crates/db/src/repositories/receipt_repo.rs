//! Repository for `food_receipts`, `food_contents` and `food_receipt_contents`.

use ledger_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::receipt::{
    CreateReceipt, FoodContent, FoodReceipt, ReceiptContent, ReceiptWithContents,
};

const RECEIPT_COLUMNS: &str = "id, store_name, total_price";

const FOOD_COLUMNS: &str = "id, name, calories, lipid, carbohydrate, protein";

/// Provides receipt registration and lookup.
pub struct ReceiptRepo;

impl ReceiptRepo {
    /// Register a receipt and all of its items in one transaction.
    ///
    /// Each item is resolved to a `food_contents` row by name (created with
    /// zero nutrients when absent). Any failure rolls back every row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateReceipt,
    ) -> Result<ReceiptWithContents, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO food_receipts (store_name, total_price) VALUES ($1, $2) \
             RETURNING {RECEIPT_COLUMNS}"
        );
        let receipt = sqlx::query_as::<_, FoodReceipt>(&insert_query)
            .bind(&input.store_name)
            .bind(input.total_price)
            .fetch_one(&mut *tx)
            .await?;

        let mut contents = Vec::with_capacity(input.items.len());
        for item in &input.items {
            let food = Self::resolve_food_content(&mut tx, &item.name).await?;
            let row_id: (DbId,) = sqlx::query_as(
                "INSERT INTO food_receipt_contents (food_receipt_id, food_content_id, price, amount) \
                 VALUES ($1, $2, $3, 1) RETURNING id",
            )
            .bind(receipt.id)
            .bind(food.id)
            .bind(item.price)
            .fetch_one(&mut *tx)
            .await?;

            contents.push(ReceiptContent {
                id: row_id.0,
                food_receipt_id: receipt.id,
                food_content_id: food.id,
                name: food.name,
                price: item.price,
                amount: 1,
            });
        }

        tx.commit().await?;
        Ok(ReceiptWithContents { receipt, contents })
    }

    /// Find a receipt header by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<FoodReceipt>, sqlx::Error> {
        let query = format!("SELECT {RECEIPT_COLUMNS} FROM food_receipts WHERE id = $1");
        sqlx::query_as::<_, FoodReceipt>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the line items of a receipt in insertion order.
    pub async fn list_contents(
        pool: &PgPool,
        food_receipt_id: DbId,
    ) -> Result<Vec<ReceiptContent>, sqlx::Error> {
        sqlx::query_as::<_, ReceiptContent>(
            "SELECT c.id, c.food_receipt_id, c.food_content_id, f.name, c.price, c.amount
             FROM food_receipt_contents c
             JOIN food_contents f ON f.id = c.food_content_id
             WHERE c.food_receipt_id = $1
             ORDER BY c.id",
        )
        .bind(food_receipt_id)
        .fetch_all(pool)
        .await
    }

    /// Find-or-create a food content row by name inside the receipt transaction.
    async fn resolve_food_content(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
    ) -> Result<FoodContent, sqlx::Error> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let query = format!(
            "INSERT INTO food_contents (name) VALUES ($1) \
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
             RETURNING {FOOD_COLUMNS}"
        );
        sqlx::query_as::<_, FoodContent>(&query)
            .bind(name)
            .fetch_one(&mut **tx)
            .await
    }
}
