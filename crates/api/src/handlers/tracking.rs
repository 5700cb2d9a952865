//! Handlers for the visitor tracking pipeline.
//!
//! The marketing site frontend reports sessions and page views anonymously;
//! none of these endpoints require authentication. Payloads are validated
//! with the accumulating tracking validator, so a 400 response enumerates
//! every violated field rather than just the first.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use meridian_core::error::CoreError;
use meridian_core::fingerprint;
use meridian_core::tracking::{self, FieldViolation, PageViewEvent, TrackingEvent};
use meridian_core::types::DbId;
use meridian_db::models::page_view::{CreatePageView, PageView};
use meridian_db::repositories::{PageViewRepo, SessionRepo};

use crate::error::{AppError, AppResult};
use crate::response::{PageViewResponse, SessionResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /track/sessions
// ---------------------------------------------------------------------------

/// Request body for session resolution.
#[derive(Debug, Deserialize)]
pub struct ResolveSessionRequest {
    /// Client-computed visitor fingerprint. When absent, one is derived
    /// from the request headers.
    pub fingerprint: Option<String>,
}

/// Resolve the tracking session for a visitor fingerprint.
///
/// Returns the session already active for the fingerprint within the
/// configured window (200), or creates a new one (201). This is the only
/// operation that creates sessions; the page view endpoints never do.
pub async fn resolve_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<ResolveSessionRequest>,
) -> AppResult<Response> {
    let fingerprint = match input.fingerprint {
        Some(fingerprint) => {
            tracking::validate_fingerprint(&fingerprint)?;
            fingerprint
        }
        None => fingerprint::derive(
            header_str(&headers, "user-agent"),
            header_str(&headers, "accept-language"),
        ),
    };

    let window = state.config.session_window_minutes;
    if let Some(session) =
        SessionRepo::find_recent_by_fingerprint(&state.pool, &fingerprint, window).await?
    {
        return Ok(Json(SessionResponse { session }).into_response());
    }

    let session = SessionRepo::create(&state.pool, &fingerprint).await?;

    tracing::debug!(session_id = %session.id, "Tracking session created");

    Ok((StatusCode::CREATED, Json(SessionResponse { session })).into_response())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}

// ---------------------------------------------------------------------------
// POST /track/page-views
// ---------------------------------------------------------------------------

/// Record a navigation entry.
///
/// The body must pass the `page_view` validator and its embedded session id
/// must reference an existing session.
pub async fn create_page_view(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let event = tracking::validate_page_view(&body).map_err(AppError::Validation)?;

    let page_view = insert_page_view(&state, event).await?;

    Ok((StatusCode::CREATED, Json(PageViewResponse { page_view })))
}

// ---------------------------------------------------------------------------
// PATCH /track/page-views/{id}
// ---------------------------------------------------------------------------

/// Record a page exit for an existing page view.
pub async fn record_page_exit(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let time_on_page = tracking::validate_time_on_page(&body).map_err(AppError::Validation)?;

    let page_view = apply_page_exit(&state, id, time_on_page).await?;

    Ok(Json(PageViewResponse { page_view }))
}

// ---------------------------------------------------------------------------
// POST /track/events
// ---------------------------------------------------------------------------

/// Beacon-style ingest of a tagged tracking event.
///
/// The body carries the `action` discriminator alongside the event fields,
/// matching what `navigator.sendBeacon` posts from the frontend. Dispatches
/// to the same logic as the dedicated endpoints: `page_view` creates (201),
/// `page_exit` updates (200).
pub async fn ingest_event(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<Response> {
    let action = match body.get("action").and_then(Value::as_str) {
        Some(action) => action,
        None => {
            return Err(AppError::Validation(vec![FieldViolation::new(
                "action",
                "action is required",
            )]))
        }
    };

    match TrackingEvent::validate(action, &body).map_err(AppError::Validation)? {
        TrackingEvent::PageView(event) => {
            let page_view = insert_page_view(&state, event).await?;
            Ok((StatusCode::CREATED, Json(PageViewResponse { page_view })).into_response())
        }
        TrackingEvent::PageExit(event) => {
            let page_view =
                apply_page_exit(&state, event.page_view_id, event.time_on_page_seconds).await?;
            Ok(Json(PageViewResponse { page_view }).into_response())
        }
    }
}

// ---------------------------------------------------------------------------
// Shared recorder logic
// ---------------------------------------------------------------------------

/// Insert a page view after confirming its session exists.
///
/// The lookup and insert are two independent store calls with no wrapping
/// transaction. A session deleted in between fails the insert on
/// `fk_page_views_session`, which the error classifier also maps to 404.
async fn insert_page_view(state: &AppState, event: PageViewEvent) -> AppResult<PageView> {
    let session = SessionRepo::find_by_id(&state.pool, event.session_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Session",
            id: event.session_id,
        }))?;

    let page_view = PageViewRepo::create(
        &state.pool,
        &CreatePageView {
            session_id: session.id,
            page_path: event.page_path,
            locale: event.locale,
            referrer: event.referrer,
        },
    )
    .await?;

    tracing::debug!(
        page_view_id = %page_view.id,
        session_id = %page_view.session_id,
        page_path = %page_view.page_path,
        "Page view recorded",
    );

    Ok(page_view)
}

/// Apply a page exit update, mapping a missing row to a not-found error.
async fn apply_page_exit(
    state: &AppState,
    id: DbId,
    time_on_page_seconds: i32,
) -> AppResult<PageView> {
    let page_view = PageViewRepo::record_exit(&state.pool, id, time_on_page_seconds)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "PageView",
            id,
        }))?;

    tracing::debug!(
        page_view_id = %page_view.id,
        time_on_page_seconds,
        "Page exit recorded",
    );

    Ok(page_view)
}
