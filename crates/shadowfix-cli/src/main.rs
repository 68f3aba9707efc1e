//! CLI entrypoint for the shadowfix toolchain.
//!
//! The binary delegates to [`shadowfix_cli::run`], which loads
//! configuration, parses the subcommand, and writes reports to the given
//! streams.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    shadowfix_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
