//! Logging setup for embedders of the hot update engine.
//!
//! The engine itself only emits `tracing` events: `debug` for decision
//! traces (`[file change]`, `[config change]`, `[no modules matched]`) and
//! `info` for the human-facing `hmr update` / `page reload` lines.
//!
//! # Example
//!
//! ```rust,no_run
//! use fob_hmr::logger::init_logger;
//!
//! init_logger(false, false, false);
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "fob_hmr=info,fob_graph=info";

/// Build the filter for the given verbosity flags.
///
/// `verbose` wins over `quiet`; with neither, `RUST_LOG` is honored before
/// falling back to INFO for the fob crates.
pub fn build_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("fob_hmr=debug,fob_graph=debug")
    } else if quiet {
        EnvFilter::new("fob_hmr=error,fob_graph=error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Install a global subscriber with compact formatting.
///
/// Returns `false` if a subscriber was already installed, which makes the
/// call safe to repeat from tests.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) -> bool {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(build_filter(verbose, quiet))
        .with(fmt_layer)
        .try_init()
        .is_ok()
}
