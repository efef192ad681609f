//! Shared helpers for outbound HTTP clients and request validation.

use std::time::Duration;

use crate::errors::AppError;

/// Build a reqwest client with a bounded per-request timeout.
///
/// Both upstream services are called on the request path, so an unbounded
/// call would block the page indefinitely.
pub(crate) fn build_http_client(
    user_agent: &str,
    timeout_secs: u64,
) -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))
}

/// Trim `value` and reject it if nothing is left.
pub(crate) fn require_non_blank(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

/// Join a configured base URL and an endpoint path without doubling slashes.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
