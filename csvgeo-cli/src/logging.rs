//! Diagnostic output for the CLI.
//!
//! The libraries log through the `log` facade. The CLI installs a
//! `tracing-subscriber` formatter on stderr which also captures `log`
//! records, so provider warnings and the detail behind a generic read error
//! are visible to operators while stdout stays reserved for JSON.

use tracing_subscriber::EnvFilter;

/// Filter applied when `RUST_LOG` is unset or invalid.
pub(crate) const DEFAULT_FILTER: &str = "warn";

/// Build the level filter from `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
pub(crate) fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the stderr subscriber.
///
/// A subscriber installed earlier (for example by a test harness) is left in
/// place.
pub(crate) fn init_logging() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    drop(installed);
}
