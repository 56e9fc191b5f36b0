//! Handlers for the `/categories` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use ledger_db::models::category::Category;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;
use crate::extract::ValidJson;
use crate::state::AppState;

/// Request body for `POST /categories`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    pub categories: Vec<Category>,
}

/// POST /categories
///
/// Names are unique; a duplicate yields 409.
pub async fn create_category(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let category = state.store.create_category(&input.name).await?;
    tracing::info!(category_id = category.id, name = %category.name, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<CategoryListResponse>> {
    let categories = state.store.list_categories().await?;
    Ok(Json(CategoryListResponse { categories }))
}
