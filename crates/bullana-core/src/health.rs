/// Liveness probe: the process is up and the router is serving.
pub async fn healthz() -> &'static str {
    "ok"
}

/// Readiness probe. Equivalent to liveness for now; a service with hard
/// dependencies wraps its own handler around this.
pub async fn readyz() -> &'static str {
    "ok"
}
