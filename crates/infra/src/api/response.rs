//! Response interpretation shared by both dispatchers
//!
//! Works on status and body bytes only, so the async and blocking clients
//! classify responses identically.

use basalam_common::auth::AuthError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::errors::{ApiError, ApiResult};
use crate::http::RawResponse;

/// Final outcome of a response the retry policy has let through.
///
/// # Errors
/// Error statuses map through [`status_error`]; malformed success bodies are
/// `ApiError::Validation`.
pub fn interpret(response: &RawResponse) -> ApiResult<Option<Value>> {
    if !response.is_success() {
        return Err(status_error(response.status, response.reason, &response.body));
    }
    let body = parse_body(&response.body)?;
    debug!(status = response.status, empty = body.is_none(), "Request successful");
    Ok(body)
}

/// Error for a request rejected again after its token was refreshed.
pub fn unauthorized(response: &RawResponse) -> ApiError {
    let (_, message) = error_details(response.status, response.reason, &response.body);
    AuthError::Unauthorized(message).into()
}

/// Decode a success body. Empty (or whitespace-only) bodies yield `None`.
///
/// # Errors
/// Returns `ApiError::Validation` for bodies that are not JSON.
pub fn parse_body(body: &[u8]) -> ApiResult<Option<Value>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| ApiError::Validation(format!("response body is not valid JSON: {e}")))
}

/// Convert a decoded body into `R`; an empty body decodes as JSON `null`.
///
/// # Errors
/// Returns `ApiError::Validation` when the body does not match `R`.
pub fn decode<R: DeserializeOwned>(body: Option<Value>) -> ApiResult<R> {
    serde_json::from_value(body.unwrap_or(Value::Null))
        .map_err(|e| ApiError::Validation(format!("unexpected response shape: {e}")))
}

/// Build the error for a non-success status.
///
/// `message` comes from the body's `message` (or `detail`) field, `code`
/// from its `code` field; both fall back to what the status itself says.
pub fn status_error(status: u16, reason: Option<&str>, body: &[u8]) -> ApiError {
    let (code, message) = error_details(status, reason, body);
    if status == 404 {
        ApiError::NotFound { code, message }
    } else {
        ApiError::Api { status, code, message }
    }
}

/// `(code, message)` extracted from an error body.
pub fn error_details(status: u16, reason: Option<&str>, body: &[u8]) -> (String, String) {
    let parsed: Option<Value> = serde_json::from_slice(body).ok();
    let field = |name: &str| parsed.as_ref().and_then(|v| v.get(name)).map(text);

    let message = field("message").or_else(|| field("detail")).unwrap_or_else(|| {
        let raw = String::from_utf8_lossy(body);
        let raw = raw.trim();
        if raw.is_empty() || parsed.is_some() {
            reason.map_or_else(|| format!("HTTP {status}"), str::to_string)
        } else {
            raw.to_string()
        }
    });
    let code = field("code").unwrap_or_else(|| status.to_string());
    (code, message)
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
