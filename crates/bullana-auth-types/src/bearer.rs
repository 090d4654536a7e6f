//! Bearer-token extraction from request headers.

use http::HeaderMap;

/// Pull the bearer credential out of a request's headers.
///
/// `Authorization` is preferred; `x-access-token` is the legacy fallback some
/// clients still send. A literal `Bearer ` prefix is stripped, otherwise the
/// raw header value is returned as-is. Absent or non-UTF-8 headers yield
/// `None` — this function never fails.
pub fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let raw = headers
        .get(http::header::AUTHORIZATION)
        .or_else(|| headers.get("x-access-token"))
        .and_then(|v| v.to_str().ok())?;

    let token = raw.strip_prefix("Bearer ").unwrap_or(raw);
    if token.is_empty() {
        return None;
    }
    Some(token.to_owned())
}
