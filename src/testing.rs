// Copyright 2021-2025 Martin Pool

//! Test-only tracing setup, so a failing test's logs are visible without
//! every test hand-rolling a subscriber.

use std::sync::Once;

static INIT: Once = Once::new();

/// Install a `tracing` subscriber that writes to the test harness's captured
/// stdout, honoring `RUST_LOG` if set. Safe to call from every test; only
/// the first call has any effect.
pub fn init_tracing_for_tests() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
