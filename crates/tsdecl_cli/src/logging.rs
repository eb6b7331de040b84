//! Logging initialization for the CLI.
//!
//! Library crates only emit `tracing` events; the subscriber is installed
//! here. Output goes to stderr so that stdout stays machine-readable.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber.
///
/// `verbosity` 0 logs warnings only, 1 adds DEBUG for tsdecl crates, 2 and
/// above TRACE. `RUST_LOG` supplies the base filter when set.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let filter = match verbosity {
        0 => filter,
        1 => with_tsdecl_level(filter, Level::DEBUG),
        _ => with_tsdecl_level(filter, Level::TRACE),
    };

    // A second initialization (tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .try_init();
}

fn with_tsdecl_level(filter: EnvFilter, level: Level) -> EnvFilter {
    ["tsdecl", "tsdecl_parser", "tsdecl_scanner", "tsdecl_ast"]
        .into_iter()
        .filter_map(|target| format!("{target}={level}").parse().ok())
        .fold(filter, EnvFilter::add_directive)
}
