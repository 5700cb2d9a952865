//! Shared response envelope types for API handlers.
//!
//! Success bodies wrap the resource under a named key (`session`,
//! `pageView`) so payloads can grow without breaking callers. Use these
//! instead of ad-hoc `serde_json::json!` maps to get compile-time type
//! safety and consistent serialization.

use meridian_db::models::page_view::PageView;
use meridian_db::models::session::Session;
use serde::Serialize;

/// `{ "session": ... }` envelope returned by session resolution.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: Session,
}

/// `{ "pageView": ... }` envelope returned by the page view endpoints.
#[derive(Debug, Serialize)]
pub struct PageViewResponse {
    #[serde(rename = "pageView")]
    pub page_view: PageView,
}
