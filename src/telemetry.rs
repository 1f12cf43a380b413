//! Telemetry helpers for applications embedding `series-pipeline`.
//!
//! The pipeline only emits `tracing` events; installing a subscriber is the
//! host's call. `init_default_tracing` covers the common case.

/// Initializes a compact `tracing` subscriber when the `telemetry` feature is
/// enabled, filtered by `RUST_LOG` and falling back to `info`.
///
/// Returns `false` when the feature is disabled or the host application
/// already installed a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_filter("info")
}

/// Same as [`init_default_tracing`] with an explicit fallback directive,
/// e.g. `"series_pipeline=trace"`. `RUST_LOG` still wins when set.
#[must_use]
pub fn init_tracing_with_filter(fallback: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback));
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact();

        return builder.try_init().is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback;
        false
    }
}
