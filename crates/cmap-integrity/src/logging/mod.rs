//! Diagnostic logging setup for the command-line tool
//!
//! The library only emits `tracing` events; installing a subscriber is left to
//! the binary. `RUST_LOG` always wins over the verbosity flag.

use tracing_subscriber::EnvFilter;

/// Default filter directive for a verbosity count (`-v` repetitions)
#[must_use]
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install the global subscriber, writing to stderr
///
/// Returns `false` if a subscriber was already installed.
pub fn init(verbosity: u8, json: bool) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}
