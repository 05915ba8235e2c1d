//! Error formatting for catalog failures.
//!
//! Catalog errors reach the UI as raw HTTP status codes and response bodies.
//! This module turns them into short messages a shopper can read.

use serde_json::Value;

use storefront_types::{NonEmptyStaticStr, NonEmptyString, truncate_with_ellipsis};

const LOAD_FAILED_BADGE: NonEmptyStaticStr = NonEmptyStaticStr::new("[Loading failed]");

const MAX_DETAIL_CHARS: usize = 160;

/// Pull a human-readable message out of a JSON error body.
///
/// Understands the PostgREST shape (`{"message": ...}`), the gateway shape
/// (`{"error": ..., "error_description": ...}`) and `{"msg": ...}`.
pub fn extract_error_message(body: &str) -> Option<String> {
    let payload: Value = serde_json::from_str(body.trim()).ok()?;
    payload
        .pointer("/message")
        .and_then(Value::as_str)
        .or_else(|| payload.pointer("/error_description").and_then(Value::as_str))
        .or_else(|| payload.pointer("/error/message").and_then(Value::as_str))
        .or_else(|| payload.pointer("/error").and_then(Value::as_str))
        .or_else(|| payload.pointer("/msg").and_then(Value::as_str))
        .or_else(|| payload.as_str())
        .map(ToString::to_string)
}

#[must_use]
pub fn is_auth_error(status: Option<u16>, detail: &str) -> bool {
    if matches!(status, Some(401 | 403)) {
        return true;
    }
    let lower = detail.to_ascii_lowercase();
    lower.contains("invalid api key")
        || lower.contains("no api key found")
        || lower.contains("jwt expired")
        || lower.contains("jwserror")
}

/// Format a catalog failure into a user-friendly message.
///
/// `what` names the thing being loaded ("products", "product").
#[must_use]
pub fn format_catalog_error(what: &str, status: Option<u16>, body: &str) -> NonEmptyString {
    let trimmed = body.trim();
    let extracted = extract_error_message(trimmed).unwrap_or_else(|| trimmed.to_string());

    let mut content = String::new();
    content.push_str(LOAD_FAILED_BADGE.as_str());
    content.push(' ');

    if is_auth_error(status, &extracted) {
        content.push_str("The catalog rejected the storefront credentials while loading ");
        content.push_str(what);
        content.push_str(". Check the catalog anon key in the config file or environment.");
        return NonEmptyString::new(content).unwrap_or_else(|_| LOAD_FAILED_BADGE.into());
    }

    content.push_str("Could not load ");
    content.push_str(what);
    if let Some(status) = status {
        content.push_str(&format!(" ({status})"));
    }
    content.push('.');

    let detail = truncate_with_ellipsis(&extracted, MAX_DETAIL_CHARS);
    if !detail.is_empty() {
        content.push(' ');
        content.push_str(&detail);
    }

    NonEmptyString::new(content).unwrap_or_else(|_| LOAD_FAILED_BADGE.into())
}
