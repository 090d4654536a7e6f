use tracing_subscriber::EnvFilter;

/// Install the global JSON subscriber, filtered by `RUST_LOG`.
///
/// Idempotent: a later call finds the global dispatcher already set and
/// leaves it alone, which keeps shared-process test binaries happy.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
