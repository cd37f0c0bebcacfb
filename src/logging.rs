//! Diagnostic logging
//!
//! Logs go to stderr through `tracing-subscriber` so they never mix with
//! stdout output. `SIZEMAP_LOG` takes any `EnvFilter` directive and wins
//! over the verbosity flags.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding a log filter directive.
pub const LOG_ENV: &str = "SIZEMAP_LOG";

/// Map `-q` / `-v` counts to a level name.
pub fn level_for(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Build the filter from `SIZEMAP_LOG`, falling back to the given level.
fn build_env_filter(default_level: &str) -> EnvFilter {
    match std::env::var(LOG_ENV) {
        Ok(directive) if !directive.trim().is_empty() => {
            EnvFilter::try_new(&directive).unwrap_or_else(|err| {
                eprintln!("sizemap: ignoring invalid {}='{}': {}", LOG_ENV, directive, err);
                EnvFilter::new(default_level)
            })
        }
        _ => EnvFilter::new(default_level),
    }
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_logging(verbosity: u8, quiet: bool, use_color: bool) {
    let filter = build_env_filter(level_for(verbosity, quiet));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(use_color)
                .without_time(),
        )
        .try_init();
}
