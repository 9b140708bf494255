mod app;
mod config;
mod display;
mod logging;
mod process;
mod system;
mod workload;

use clap::Parser;
use config::Cli;
use std::fmt::Display;
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => return fail(&e),
    };

    match rt.block_on(app::run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

fn fail(err: &dyn Display) -> ExitCode {
    let _ = report_error(&mut io::stderr(), err);
    ExitCode::FAILURE
}

/// The single line a failed run leaves on stderr
fn report_error(out: &mut impl Write, err: &dyn Display) -> io::Result<()> {
    writeln!(out, "Error: {}", err)
}
