use std::env;
use std::io;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber. Logs always go to stderr.
///
/// `KOSA_LOG` takes an `EnvFilter` directive; without it the level is
/// `warn`, or debug for kosa crates when `verbose` or `DEBUG` is set.
/// `KOSA_LOG_FORMAT=json` switches to JSON lines.
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("KOSA_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "kosa_core=debug,kosa_cli=debug,info"
        } else {
            "warn"
        })
    });

    let format = env::var("KOSA_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
    }
}
