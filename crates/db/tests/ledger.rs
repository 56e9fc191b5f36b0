//! Repository tests for categories, expenses and receipts against PostgreSQL.
//!
//! Run with `DATABASE_URL=... cargo test -p ledger-db -- --ignored`.

use ledger_db::models::expense::CreateExpense;
use ledger_db::models::receipt::{CreateReceipt, CreateReceiptItem};
use ledger_db::models::user::CreateUser;
use ledger_db::repositories::{CategoryRepo, ExpenseRepo, ReceiptRepo, UserRepo};
use sqlx::PgPool;

async fn user_id(pool: &PgPool) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            name: "bob".to_string(),
            password: "hash".to_string(),
            email: "bob@example.com".to_string(),
            age: 40,
            balance: 0,
        },
    )
    .await
    .unwrap()
    .id
}

fn item(name: &str, price: i64) -> CreateReceiptItem {
    CreateReceiptItem {
        name: name.to_string(),
        price,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_list_expenses_joins_store_name(pool: PgPool) {
    let user_id = user_id(&pool).await;
    let category = CategoryRepo::create(&pool, "food").await.unwrap();
    let receipt = ReceiptRepo::create(
        &pool,
        &CreateReceipt {
            store_name: "Lawson".to_string(),
            total_price: 150,
            items: vec![item("onigiri", 150)],
        },
    )
    .await
    .unwrap();

    for food_receipt_id in [None, Some(receipt.receipt.id)] {
        ExpenseRepo::create(
            &pool,
            &CreateExpense {
                user_id,
                category_id: category.id,
                amount: 150,
                food_receipt_id,
                comment: None,
            },
        )
        .await
        .unwrap();
    }

    let rows = ExpenseRepo::list_for_user(&pool, user_id).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].store_name, "");
    assert_eq!(rows[1].store_name, "Lawson");
    assert!(rows[0].comment.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_expense_with_unknown_user_fails(pool: PgPool) {
    let category = CategoryRepo::create(&pool, "misc").await.unwrap();
    let result = ExpenseRepo::create(
        &pool,
        &CreateExpense {
            user_id: 9_999,
            category_id: category.id,
            amount: 1,
            food_receipt_id: None,
            comment: None,
        },
    )
    .await;
    assert!(result.is_err());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_receipt_items_reuse_food_content(pool: PgPool) {
    let created = ReceiptRepo::create(
        &pool,
        &CreateReceipt {
            store_name: "Seven".to_string(),
            total_price: 400,
            items: vec![item("onigiri", 150), item("onigiri", 150), item("tea", 100)],
        },
    )
    .await
    .unwrap();

    let contents = ReceiptRepo::list_contents(&pool, created.receipt.id)
        .await
        .unwrap();
    assert_eq!(contents, created.contents);
    assert_eq!(contents[0].food_content_id, contents[1].food_content_id);
    assert_ne!(contents[0].food_content_id, contents[2].food_content_id);

    let header = ReceiptRepo::find_by_id(&pool, created.receipt.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(header.store_name, "Seven");
    assert_eq!(header.total_price, 400);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_failed_receipt_item_rolls_back_header(pool: PgPool) {
    // PostgreSQL rejects NUL bytes in TEXT, so the second item fails after
    // the header row was already inserted.
    let result = ReceiptRepo::create(
        &pool,
        &CreateReceipt {
            store_name: "Broken".to_string(),
            total_price: 100,
            items: vec![item("tea", 100), item("bad\0name", 1)],
        },
    )
    .await;
    assert!(result.is_err());

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM food_receipts")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 0, "header must be rolled back with its items");
}
