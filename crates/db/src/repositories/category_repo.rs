//! Repository for the `categories` table.

use sqlx::PgPool;

use crate::models::category::Category;

/// Provides create/list operations for expense categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a new category, returning the created row.
    pub async fn create(pool: &PgPool, name: &str) -> Result<Category, sqlx::Error> {
        sqlx::query_as::<_, Category>("INSERT INTO categories (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// List all categories ordered by id.
    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(pool)
            .await
    }
}
