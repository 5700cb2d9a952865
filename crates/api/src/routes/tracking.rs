//! Route definitions for the visitor tracking pipeline.

use axum::routing::{patch, post};
use axum::Router;

use crate::handlers::tracking;
use crate::state::AppState;

/// Tracking routes mounted at `/track`.
///
/// ```text
/// POST  /sessions          -> resolve_session
/// POST  /events            -> ingest_event
/// POST  /page-views        -> create_page_view
/// PATCH /page-views/{id}   -> record_page_exit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(tracking::resolve_session))
        .route("/events", post(tracking::ingest_event))
        .route("/page-views", post(tracking::create_page_view))
        .route("/page-views/{id}", patch(tracking::record_page_exit))
}
