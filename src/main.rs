use anyhow::{Context, Result};
use clap::Parser;
use greyfix_age::{cli::Cli, config::Config, exit_codes::ExitCode, plugin, report};
use std::io::Write;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Write a report to stdout
fn emit(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .and_then(|()| stdout.flush())
        .context("Failed to write report")
}

/// Run the selected command and return the process exit status
fn run(args: &Cli) -> Result<i32> {
    let command = match args.command() {
        Ok(command) => command,
        Err(unknown) => {
            emit(&report::comment(&unknown.to_string()))?;
            return Ok(ExitCode::Failure.as_i32());
        }
    };

    let config = Config::from_env().context("Invalid plugin configuration")?;

    match plugin::execute(command, &config) {
        Ok(output) => {
            emit(&output)?;
            Ok(ExitCode::Success.as_i32())
        }
        Err(plugin::PluginError::Dump(err)) => match err.tool_status() {
            // Exit with the dump tool's own status
            Some(status) => {
                emit(&report::comment(&err.to_string()))?;
                Ok(status)
            }
            None => Err(err.into()),
        },
        Err(err) => Err(err.into()),
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let status = run(&args)?;
    if status != ExitCode::Success.as_i32() {
        std::process::exit(status);
    }
    Ok(())
}
