#![forbid(unsafe_code)]

use std::process::ExitCode;

use kosa_cli::cmd::scc::{SccArgs, run_scc};
use kosa_cli::{finish, logging, parse_args};

fn main() -> ExitCode {
    let args: SccArgs = match parse_args() {
        Ok(args) => args,
        Err(code) => return code,
    };
    logging::init_tracing(args.common.verbose);
    finish(run_scc(&args), args.output_mode())
}
