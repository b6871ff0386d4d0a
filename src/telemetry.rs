//! Opt-in tracing setup.
//!
//! The engine only emits `tracing` events. Per-frame detail (samples taken,
//! subscribers dispatched, frames written) is logged at `trace`, lifecycle
//! changes at `debug`, and timed-out gates or rejected frames at `warn`.
//! Hosts install their own subscriber or call one of these helpers.

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "scroll_choreo=info";

/// Installs a compact subscriber filtered by `RUST_LOG`, or `DEFAULT_FILTER`.
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber is already installed.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));
        return install(filter);
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}

/// Installs a compact subscriber with an explicit directive such as
/// `"scroll_choreo=trace"`, ignoring `RUST_LOG`.
#[must_use]
pub fn init_tracing_with_filter(directives: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        return install(tracing_subscriber::EnvFilter::new(directives));
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = directives;
        false
    }
}

#[cfg(feature = "telemetry")]
fn install(filter: tracing_subscriber::EnvFilter) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init()
        .is_ok()
}
