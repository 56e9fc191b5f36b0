//! Repository for the `sessions` table.

use ledger_core::types::Timestamp;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::session::{CreateSession, Session};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, user_agent, client_ip, created_at, expires_at";

/// Provides CRUD operations for sessions.
///
/// Sessions are never hard-deleted; [`SessionRepo::expire`] moves
/// `expires_at` to the current time instead.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<Session, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions (id, user_id, user_agent, client_ip, expires_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(input.id)
            .bind(input.user_id)
            .bind(&input.user_agent)
            .bind(&input.client_ip)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find a session by id regardless of whether it has expired.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Session>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE id = $1 LIMIT 1");
        sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Move a session's expiry. Returns `true` if the row exists.
    pub async fn update_expiry(
        pool: &PgPool,
        id: Uuid,
        expires_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE sessions SET expires_at = $2 WHERE id = $1")
            .bind(id)
            .bind(expires_at)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Logically delete a session by expiring it now. Returns `true` if the row exists.
    pub async fn expire(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE sessions SET expires_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
