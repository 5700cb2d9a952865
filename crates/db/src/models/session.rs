//! Tracking session model.

use meridian_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `sessions` table.
///
/// A session groups the page views of one visitor fingerprint within an
/// activity window. Rows are created once and never mutated or deleted by
/// this pipeline.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Session {
    pub id: DbId,
    pub fingerprint: String,
    pub created_at: Timestamp,
}
