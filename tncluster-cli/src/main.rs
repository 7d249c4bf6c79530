//! Entry point for the `tncluster` binary.
//!
//! Parses arguments with clap, configures diagnostics for the requested
//! verbosity, runs the selected command, writes its payload to the requested
//! output and maps failures to a non-zero exit code with a structured error
//! event carrying the library error code.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use tncluster_cli::{
    cli::{Cli, CliError, run_cli, write_summary},
    logging::{LogSettings, LoggingError, init_logging},
};
use tracing::{error, field};

fn try_main(cli: Cli) -> Result<()> {
    let summary = run_cli(cli).context("failed to execute command")?;
    write_summary(&summary).context("failed to write output")?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let installed =
        LogSettings::from_env(cli.verbose()).and_then(|settings| init_logging(&settings));
    if let Err(err) = installed {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main(cli) {
        let code = err
            .downcast_ref::<CliError>()
            .and_then(CliError::error_code)
            .map(field::display);
        error!(error = %format_args!("{err:#}"), code, "command execution failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialized"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
