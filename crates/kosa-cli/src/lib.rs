//! kosa-cli: the `graph-to-dot`, `scc-enumerate` and `path-find` tools.
//!
//! Each binary is a thin `main` over one `cmd::*::run_*` function.

#![forbid(unsafe_code)]

pub mod args;
pub mod cmd;
pub mod io;
pub mod logging;
pub mod output;

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use output::{CliError, OutputMode, render_error};

/// Parse the process arguments after [`args::normalize_args`].
///
/// Usage errors map to exit status 1; `--help` and `--version` map to 0.
///
/// # Errors
///
/// Returns the exit code to terminate with when parsing stopped early.
pub fn parse_args<P: Parser>() -> Result<P, ExitCode> {
    P::try_parse_from(args::normalize_args(std::env::args_os())).map_err(|err| {
        if let Err(print_err) = err.print() {
            debug!(error = %print_err, "failed to print usage");
        }
        if err.use_stderr() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    })
}

/// Map a command result to an exit status, rendering any error on stderr.
#[must_use]
pub fn finish(result: anyhow::Result<()>, mode: OutputMode) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(error = ?err, "command failed");
            if let Err(render_err) = render_error(mode, &CliError::from(&err)) {
                debug!(error = %render_err, "failed to render error");
            }
            ExitCode::FAILURE
        }
    }
}
