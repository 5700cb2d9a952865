//! Tracking event contract and validation.
//!
//! The browser reports two event shapes: `page_view` on navigation entry
//! and `page_exit` when the visitor leaves a page. Both arrive as untyped
//! JSON at the HTTP boundary. Validation here is total -- it never panics
//! on malformed input, always returns a discriminated result, and
//! accumulates every violated field rather than stopping at the first.

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Action constants
// ---------------------------------------------------------------------------

/// Discriminator for a navigation-entry event.
pub const ACTION_PAGE_VIEW: &str = "page_view";
/// Discriminator for a page-exit event.
pub const ACTION_PAGE_EXIT: &str = "page_exit";

/// All valid tracking actions.
pub const VALID_ACTIONS: &[&str] = &[ACTION_PAGE_VIEW, ACTION_PAGE_EXIT];

// ---------------------------------------------------------------------------
// Validation constants
// ---------------------------------------------------------------------------

/// Minimum length of a locale code (e.g. `en`).
pub const LOCALE_MIN_LEN: usize = 2;
/// Maximum length of a locale code (e.g. `pt-BR`).
pub const LOCALE_MAX_LEN: usize = 5;
/// Maximum accepted length for a client-supplied visitor fingerprint.
pub const FINGERPRINT_MAX_LEN: usize = 256;

// ---------------------------------------------------------------------------
// Event shapes
// ---------------------------------------------------------------------------

/// A validated navigation-entry event.
#[derive(Debug, Clone, PartialEq)]
pub struct PageViewEvent {
    pub session_id: Uuid,
    pub page_path: String,
    pub locale: String,
    /// Defaults to the empty string when the browser reports none.
    pub referrer: String,
}

/// A validated page-exit event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageExitEvent {
    pub page_view_id: Uuid,
    pub time_on_page_seconds: i32,
}

/// The two tracking event shapes, discriminated by the `action` field.
///
/// This is the ephemeral input contract at the boundary only -- events are
/// never persisted in this form.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackingEvent {
    PageView(PageViewEvent),
    PageExit(PageExitEvent),
}

impl TrackingEvent {
    /// Validate an untyped payload against the shape declared by `action`.
    ///
    /// An unknown action is itself a violation on the `action` field.
    pub fn validate(action: &str, payload: &Value) -> Result<Self, Vec<FieldViolation>> {
        match action {
            ACTION_PAGE_VIEW => validate_page_view(payload).map(TrackingEvent::PageView),
            ACTION_PAGE_EXIT => validate_page_exit(payload).map(TrackingEvent::PageExit),
            other => Err(vec![FieldViolation::new(
                "action",
                format!("Unknown tracking action '{other}'. Must be one of: {VALID_ACTIONS:?}"),
            )]),
        }
    }
}

/// A single field-level contract violation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Shape validators
// ---------------------------------------------------------------------------

/// Validate a `page_view` payload, accumulating every violated field.
pub fn validate_page_view(payload: &Value) -> Result<PageViewEvent, Vec<FieldViolation>> {
    let mut violations = Vec::new();

    let session_id = check_uuid(payload, "sessionId", &mut violations);
    let page_path = check_non_empty_string(payload, "pagePath", &mut violations);
    let locale = check_locale(payload, &mut violations);
    let referrer = check_referrer(payload, &mut violations);

    match (session_id, page_path, locale, referrer) {
        (Some(session_id), Some(page_path), Some(locale), Some(referrer))
            if violations.is_empty() =>
        {
            Ok(PageViewEvent {
                session_id,
                page_path,
                locale,
                referrer,
            })
        }
        _ => Err(violations),
    }
}

/// Validate a `page_exit` payload, accumulating every violated field.
pub fn validate_page_exit(payload: &Value) -> Result<PageExitEvent, Vec<FieldViolation>> {
    let mut violations = Vec::new();

    let page_view_id = check_uuid(payload, "pageViewId", &mut violations);
    let time_on_page = check_time_on_page(payload, &mut violations);

    match (page_view_id, time_on_page) {
        (Some(page_view_id), Some(time_on_page_seconds)) if violations.is_empty() => {
            Ok(PageExitEvent {
                page_view_id,
                time_on_page_seconds,
            })
        }
        _ => Err(violations),
    }
}

/// Validate only the `timeOnPage` constraint of a `page_exit` payload.
///
/// Used by the PATCH endpoint, where the page-view id arrives as a path
/// parameter instead of a body field.
pub fn validate_time_on_page(payload: &Value) -> Result<i32, Vec<FieldViolation>> {
    let mut violations = Vec::new();
    match check_time_on_page(payload, &mut violations) {
        Some(seconds) if violations.is_empty() => Ok(seconds),
        _ => Err(violations),
    }
}

/// Validate a client-supplied visitor fingerprint.
///
/// Fingerprints are opaque identifiers -- no normalization is applied, only
/// presence and a length bound are enforced.
pub fn validate_fingerprint(fingerprint: &str) -> Result<(), CoreError> {
    if fingerprint.is_empty() {
        return Err(CoreError::Validation(
            "fingerprint must not be empty".to_string(),
        ));
    }
    if fingerprint.len() > FINGERPRINT_MAX_LEN {
        return Err(CoreError::Validation(format!(
            "fingerprint exceeds maximum length of {FINGERPRINT_MAX_LEN} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Field checks
// ---------------------------------------------------------------------------

fn check_uuid(payload: &Value, field: &str, violations: &mut Vec<FieldViolation>) -> Option<Uuid> {
    match payload.get(field) {
        None | Some(Value::Null) => {
            violations.push(FieldViolation::new(field, format!("{field} is required")));
            None
        }
        Some(Value::String(s)) => match Uuid::parse_str(s) {
            Ok(id) => Some(id),
            Err(_) => {
                violations.push(FieldViolation::new(
                    field,
                    format!("{field} must be a valid UUID"),
                ));
                None
            }
        },
        Some(_) => {
            violations.push(FieldViolation::new(field, format!("{field} must be a string")));
            None
        }
    }
}

fn check_non_empty_string(
    payload: &Value,
    field: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    match payload.get(field) {
        None | Some(Value::Null) => {
            violations.push(FieldViolation::new(field, format!("{field} is required")));
            None
        }
        Some(Value::String(s)) if s.is_empty() => {
            violations.push(FieldViolation::new(field, format!("{field} must not be empty")));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            violations.push(FieldViolation::new(field, format!("{field} must be a string")));
            None
        }
    }
}

fn check_locale(payload: &Value, violations: &mut Vec<FieldViolation>) -> Option<String> {
    let locale = check_non_empty_string(payload, "locale", violations)?;
    if locale.len() < LOCALE_MIN_LEN || locale.len() > LOCALE_MAX_LEN {
        violations.push(FieldViolation::new(
            "locale",
            format!("locale must be {LOCALE_MIN_LEN} to {LOCALE_MAX_LEN} characters"),
        ));
        return None;
    }
    Some(locale)
}

fn check_referrer(payload: &Value, violations: &mut Vec<FieldViolation>) -> Option<String> {
    match payload.get("referrer") {
        None | Some(Value::Null) => Some(String::new()),
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            violations.push(FieldViolation::new("referrer", "referrer must be a string"));
            None
        }
    }
}

fn check_time_on_page(payload: &Value, violations: &mut Vec<FieldViolation>) -> Option<i32> {
    const FIELD: &str = "timeOnPage";
    let value = match payload.get(FIELD) {
        None | Some(Value::Null) => {
            violations.push(FieldViolation::new(FIELD, format!("{FIELD} is required")));
            return None;
        }
        Some(value) => value,
    };
    match value.as_i64() {
        Some(seconds) if seconds < 0 => {
            violations.push(FieldViolation::new(
                FIELD,
                format!("{FIELD} must be a non-negative integer"),
            ));
            None
        }
        Some(seconds) if seconds > i64::from(i32::MAX) => {
            violations.push(FieldViolation::new(
                FIELD,
                format!("{FIELD} exceeds the maximum of {} seconds", i32::MAX),
            ));
            None
        }
        Some(seconds) => Some(seconds as i32),
        // Fractional numbers, strings, booleans, arrays, objects.
        None => {
            violations.push(FieldViolation::new(
                FIELD,
                format!("{FIELD} must be a non-negative integer"),
            ));
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
