//! Persistence layer for the account book.
//!
//! - [`repositories`] -- zero-sized repository structs issuing SQL against a [`DbPool`].
//! - [`store`] -- the [`CredentialStore`] / [`LedgerStore`] capabilities the HTTP layer consumes.
//! - [`pg::PgStore`] -- production store backed by the repositories.
//! - [`memory::MemoryStore`] -- in-process store for tests and local runs.

use sqlx::postgres::PgPoolOptions;

pub mod memory;
pub mod models;
pub mod pg;
pub mod repositories;
pub mod store;

pub use memory::MemoryStore;
pub use pg::PgStore;
pub use store::{CredentialStore, LedgerStore, Store, StoreError};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply any pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
