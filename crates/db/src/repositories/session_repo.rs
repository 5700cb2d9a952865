//! Repository for the `sessions` table.

use meridian_core::types::DbId;
use sqlx::PgPool;

use crate::models::session::Session;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, fingerprint, created_at";

/// Storage operations backing session resolution.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session for the given fingerprint, returning the row.
    pub async fn create(pool: &PgPool, fingerprint: &str) -> Result<Session, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions (fingerprint)
             VALUES ($1)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(fingerprint)
            .fetch_one(pool)
            .await
    }

    /// Find a session by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Session>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE id = $1");
        sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the most recent session for a fingerprint created within the
    /// last `window_minutes`.
    ///
    /// Fingerprints are opaque and matched exactly; no normalization.
    pub async fn find_recent_by_fingerprint(
        pool: &PgPool,
        fingerprint: &str,
        window_minutes: i32,
    ) -> Result<Option<Session>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions
             WHERE fingerprint = $1
               AND created_at > NOW() - make_interval(mins => $2)
             ORDER BY created_at DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(fingerprint)
            .bind(window_minutes)
            .fetch_optional(pool)
            .await
    }
}
