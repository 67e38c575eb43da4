//! Tracing subscriber setup for the `dss` binary.
//!
//! Library code only emits events; installing a subscriber is the binary's job.
//! Output goes to stderr so stdout stays clean for reports.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directive (e.g. `debug`,
/// `adspend_dss::analytics=trace`).
pub const LOG_ENV: &str = "DSS_LOG";

pub const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
