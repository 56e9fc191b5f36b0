//! HTTP-level integration tests for expenses and categories.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, get_with_cookie, post_json_with_cookie, register};
use ledger_db::memory::Operation;
use ledger_db::MemoryStore;
use serde_json::json;

/// Register a user and create one category. Returns (app, cookie, user id, category id).
async fn setup(store: Arc<MemoryStore>) -> (axum::Router, String, i64, i64) {
    let app = common::build_test_app(store);
    let (user_id, cookie) = register(app.clone(), "alice7", "a@example.com").await;
    let response =
        post_json_with_cookie(app.clone(), "/categories", json!({ "name": "food" }), &cookie).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let category_id = body_json(response).await["id"].as_i64().unwrap();
    (app, cookie, user_id, category_id)
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[tokio::test]
async fn categories_can_be_created_and_listed() {
    let (app, cookie, _, _) = setup(Arc::new(MemoryStore::new())).await;
    post_json_with_cookie(app.clone(), "/categories", json!({ "name": "rent" }), &cookie).await;

    let response = get_with_cookie(app, "/categories", &cookie).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let names: Vec<&str> = json["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["food", "rent"]);
}

#[tokio::test]
async fn duplicate_category_returns_409() {
    let (app, cookie, _, _) = setup(Arc::new(MemoryStore::new())).await;

    let response =
        post_json_with_cookie(app, "/categories", json!({ "name": "food" }), &cookie).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[tokio::test]
async fn empty_category_name_returns_400() {
    let (app, cookie, _, _) = setup(Arc::new(MemoryStore::new())).await;

    let response = post_json_with_cookie(app, "/categories", json!({ "name": "" }), &cookie).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Expenses
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_expense_returns_201() {
    let (app, cookie, user_id, category_id) = setup(Arc::new(MemoryStore::new())).await;
    let body = json!({
        "user_id": user_id,
        "category_id": category_id,
        "amount": 1200,
        "comment": "lunch",
    });

    let response = post_json_with_cookie(app, "/expenses", body, &cookie).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["id"].as_i64().unwrap() > 0);
    assert_eq!(json["user_id"], user_id);
    assert_eq!(json["category_id"], category_id);
    assert_eq!(json["amount"], 1200);
    assert_eq!(json["comment"], "lunch");
    assert!(json["food_receipt_id"].is_null());
    assert!(json["created_at"].is_string());
}

#[tokio::test]
async fn negative_amount_is_income_and_comment_defaults_to_empty() {
    let (app, cookie, user_id, category_id) = setup(Arc::new(MemoryStore::new())).await;
    let body = json!({ "user_id": user_id, "category_id": category_id, "amount": -5000 });

    let response = post_json_with_cookie(app, "/expenses", body, &cookie).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["amount"], -5000);
    assert_eq!(json["comment"], "");
}

#[tokio::test]
async fn invalid_expense_bodies_return_400() {
    let (app, cookie, user_id, category_id) = setup(Arc::new(MemoryStore::new())).await;

    let bodies = [
        json!({ "user_id": user_id, "category_id": category_id, "amount": 0 }),
        json!({ "user_id": user_id, "category_id": category_id }),
        json!({ "category_id": category_id, "amount": 10 }),
        json!({ "user_id": 0, "category_id": category_id, "amount": 10 }),
    ];
    for body in bodies {
        let response = post_json_with_cookie(app.clone(), "/expenses", body, &cookie).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn unknown_category_returns_400() {
    let (app, cookie, user_id, _) = setup(Arc::new(MemoryStore::new())).await;
    let body = json!({ "user_id": user_id, "category_id": 999, "amount": 10 });

    let response = post_json_with_cookie(app, "/expenses", body, &cookie).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_expenses_in_id_order_with_store_names() {
    let (app, cookie, user_id, category_id) = setup(Arc::new(MemoryStore::new())).await;

    let receipt = json!({
        "store_name": "Corner Market",
        "food_contents": [{ "name": "milk", "price": 200 }],
        "total_price": 200,
    });
    let response = post_json_with_cookie(app.clone(), "/receipts", receipt, &cookie).await;
    let receipt_id = body_json(response).await["id"].as_i64().unwrap();

    for (amount, receipt) in [(100, None), (200, Some(receipt_id))] {
        let body = json!({
            "user_id": user_id,
            "category_id": category_id,
            "amount": amount,
            "food_receipt_id": receipt,
        });
        let response = post_json_with_cookie(app.clone(), "/expenses", body, &cookie).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let uri = format!("/expenses?user_id={user_id}");
    let response = get_with_cookie(app, &uri, &cookie).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let expenses = json["expenses"].as_array().unwrap();
    assert_eq!(expenses.len(), 2);
    assert_eq!(expenses[0]["amount"], 100);
    assert_eq!(expenses[0]["store_name"], "");
    assert_eq!(expenses[1]["amount"], 200);
    assert_eq!(expenses[1]["store_name"], "Corner Market");
    assert!(expenses[0]["id"].as_i64() < expenses[1]["id"].as_i64());
}

#[tokio::test]
async fn list_expenses_for_user_without_any_is_empty() {
    let (app, cookie, user_id, _) = setup(Arc::new(MemoryStore::new())).await;

    let uri = format!("/expenses?user_id={user_id}");
    let response = get_with_cookie(app, &uri, &cookie).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["expenses"], json!([]));
}

#[tokio::test]
async fn list_expenses_requires_user_id() {
    let (app, cookie, _, _) = setup(Arc::new(MemoryStore::new())).await;

    let response = get_with_cookie(app, "/expenses", &cookie).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_expenses_store_failure_returns_500() {
    let store = Arc::new(MemoryStore::new());
    let (app, cookie, user_id, _) = setup(store.clone()).await;
    store.fail_on(Operation::ListExpenses).await;

    let uri = format!("/expenses?user_id={user_id}");
    let response = get_with_cookie(app, &uri, &cookie).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["code"], "INTERNAL_ERROR");
}
