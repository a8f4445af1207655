//! Logging setup for the lath CLI.
//!
//! Structured logging via the `tracing` ecosystem: `--verbose` turns on
//! debug-level events for the lath crates, `--quiet` restricts output to
//! errors, and `RUST_LOG` overrides both when neither flag is set.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new("lath=debug,lath_store=debug,lath_gen=debug,lath_graph=debug,lath_cli=debug")
    } else if quiet {
        EnvFilter::new("lath=error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("lath=info,lath_store=info,lath_gen=info,lath_graph=info,lath_cli=info")
        })
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
