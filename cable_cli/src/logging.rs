//! Logging setup for the CLI.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialise the tracing subscriber.
///
/// The level comes from `RUST_LOG` (default `info`), for example
/// `RUST_LOG=cable_core=debug` to trace each sizing stage. Output goes to
/// stderr so the JSON printed on stdout stays clean.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .init();
}
