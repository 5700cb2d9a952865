//! Page view model and DTOs.

use meridian_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `page_views` table.
///
/// `exit_time` and `time_on_page_seconds` stay NULL until the exit update
/// arrives; a page view that never receives one remains in that state.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PageView {
    pub id: DbId,
    pub session_id: DbId,
    pub page_path: String,
    pub locale: String,
    pub referrer: String,
    pub entry_time: Timestamp,
    pub exit_time: Option<Timestamp>,
    pub time_on_page_seconds: Option<i32>,
}

/// DTO for inserting a new page view.
#[derive(Debug, Clone)]
pub struct CreatePageView {
    pub session_id: DbId,
    pub page_path: String,
    pub locale: String,
    pub referrer: String,
}
