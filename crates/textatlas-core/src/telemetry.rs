//! Tracing subscriber setup for binaries and example drivers.

/// Install a formatted tracing subscriber honoring `RUST_LOG`.
///
/// Falls back to `default_level` when `RUST_LOG` is unset. Calling this more
/// than once is a no-op; the first subscriber wins.
pub fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
