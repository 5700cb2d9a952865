pub mod health;
pub mod tracking;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /track/sessions             resolve session (POST, public)
/// /track/events               beacon event ingest (POST, public)
/// /track/page-views           create page view (POST, public)
/// /track/page-views/{id}      record page exit (PATCH, public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Visitor tracking pipeline (anonymous, no auth).
        .nest("/track", tracking::router())
}
