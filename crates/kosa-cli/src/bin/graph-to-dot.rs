#![forbid(unsafe_code)]

use std::process::ExitCode;

use kosa_cli::cmd::dot::{DotArgs, run_dot};
use kosa_cli::output::OutputMode;
use kosa_cli::{finish, logging, parse_args};

fn main() -> ExitCode {
    let args: DotArgs = match parse_args() {
        Ok(args) => args,
        Err(code) => return code,
    };
    logging::init_tracing(args.common.verbose);
    finish(run_dot(&args), OutputMode::Text)
}
