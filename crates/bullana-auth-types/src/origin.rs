//! Origin allow-list checked before any token work.

use http::HeaderMap;

/// Configured set of browser origins allowed to reach authenticated routes.
///
/// Membership is exact string comparison — no wildcard or suffix matching.
/// A request with no `Origin` header passes: same-origin navigations and
/// non-browser clients do not send one.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    allowed: Vec<String>,
}

impl OriginPolicy {
    pub fn new(allowed: Vec<String>) -> Self {
        Self { allowed }
    }

    pub fn is_allowed(&self, origin: Option<&str>) -> bool {
        match origin {
            None => true,
            Some(origin) => self.allowed.iter().any(|a| a == origin),
        }
    }

    /// Convenience: check the `Origin` header of a request.
    pub fn allows_request(&self, headers: &HeaderMap) -> bool {
        self.is_allowed(
            headers
                .get(http::header::ORIGIN)
                .and_then(|v| v.to_str().ok()),
        )
    }
}
