//! Test logging setup

use tracing_subscriber::EnvFilter;

/// Default directives when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "textres_core=warn,textres_reactive=warn";

/// Install a test-friendly `tracing` subscriber filtered by `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    install(filter);
}

/// Like [`init_test_logging`], with explicit env-filter directives
/// (e.g. [`TestResolverConfig::log_filter`](crate::TestResolverConfig::log_filter)).
pub fn init_test_logging_with(directives: &str) {
    install(EnvFilter::new(directives));
}

fn install(filter: EnvFilter) {
    // Fails when a global subscriber already exists, which is fine.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
