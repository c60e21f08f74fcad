//! Telemetry helpers for applications embedding `chart-marks`.
//!
//! Render sessions and overlays emit `tracing` events; nothing is printed
//! unless a subscriber is installed. Hosts either call `init_default_tracing`
//! or install their own subscriber and filters.

/// Installs a compact `tracing` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Returns `false` when the `telemetry` feature is disabled or when the host
/// application already installed a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
