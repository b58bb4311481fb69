#![forbid(unsafe_code)]

use std::process::ExitCode;

use kosa_cli::cmd::path::{PathArgs, run_path};
use kosa_cli::output::OutputMode;
use kosa_cli::{finish, logging, parse_args};

fn main() -> ExitCode {
    let args: PathArgs = match parse_args() {
        Ok(args) => args,
        Err(code) => return code,
    };
    logging::init_tracing(args.common.verbose);
    finish(run_path(&args), OutputMode::Text)
}
