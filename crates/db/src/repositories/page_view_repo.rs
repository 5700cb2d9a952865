//! Repository for the `page_views` table.

use meridian_core::types::DbId;
use sqlx::PgPool;

use crate::models::page_view::{CreatePageView, PageView};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, session_id, page_path, locale, referrer, entry_time, \
                       exit_time, time_on_page_seconds";

/// Storage operations backing the page view recorder.
pub struct PageViewRepo;

impl PageViewRepo {
    /// Insert a new page view, returning the created row.
    ///
    /// `entry_time` is set by the database at insert; `exit_time` and
    /// `time_on_page_seconds` start NULL. The referenced session must
    /// already exist -- this method never creates one, and an orphaned
    /// insert fails on `fk_page_views_session`.
    pub async fn create(pool: &PgPool, input: &CreatePageView) -> Result<PageView, sqlx::Error> {
        let query = format!(
            "INSERT INTO page_views (session_id, page_path, locale, referrer)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PageView>(&query)
            .bind(input.session_id)
            .bind(&input.page_path)
            .bind(&input.locale)
            .bind(&input.referrer)
            .fetch_one(pool)
            .await
    }

    /// Find a page view by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PageView>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM page_views WHERE id = $1");
        sqlx::query_as::<_, PageView>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Record a page exit: set `exit_time` to the current instant and store
    /// the reported time on page. Returns `None` when no row matches.
    ///
    /// Last write wins: a repeated exit event overwrites the previous exit
    /// time and duration.
    pub async fn record_exit(
        pool: &PgPool,
        id: DbId,
        time_on_page_seconds: i32,
    ) -> Result<Option<PageView>, sqlx::Error> {
        let query = format!(
            "UPDATE page_views
             SET exit_time = NOW(), time_on_page_seconds = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PageView>(&query)
            .bind(id)
            .bind(time_on_page_seconds)
            .fetch_optional(pool)
            .await
    }
}
