//! Tracing subscriber setup for the `che` CLI.
//!
//! Diagnostics go to stderr through `tracing`; user-facing output goes
//! through the output macros and stays on stdout. `LOG_LEVEL` (or the
//! standard `RUST_LOG`) selects the filter, defaulting to `warn` so the
//! CLI output stays clean unless the user opts in.

use std::env;
use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber.
///
/// `verbose` forces `debug` level regardless of the environment; errors
/// from double-initialization are ignored so tests can call this freely.
pub fn init_subscriber(verbose: bool) {
    let default_level = if verbose {
        "debug".to_string()
    } else {
        env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".to_string())
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
