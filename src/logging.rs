// src/logging.rs
// =============================================================================
// Sets up `tracing` so log lines go to stderr.
//
// stdout is reserved for the download record (so it can be piped into other
// tools), everything else - progress, warnings, errors - is a log event.
//
// RUST_LOG wins if it's set; otherwise we default to `info`, or `debug`
// when --verbose is passed.
// =============================================================================

use tracing_subscriber::EnvFilter;

pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
