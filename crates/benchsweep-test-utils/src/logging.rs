//! Tracing initialization for tests

use tracing_subscriber::EnvFilter;

/// Initialize tracing for a test binary.
///
/// Safe to call from every test; only the first call installs the
/// subscriber. Honors `RUST_LOG` for filtering.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
