//! Command handlers
//!
//! Each handler produces the complete stdout text for one invocation.
//! The fetch path finishes parsing before rendering anything, so a bad
//! dump never yields a partial report.

use crate::buckets;
use crate::cli::Command;
use crate::config::Config;
use crate::dump::{self, DumpError};
use crate::report::{self, Availability};
use crate::triplet::{self, ParseError};
use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors from running a plugin command
#[derive(Error, Debug)]
pub enum PluginError {
    #[error(transparent)]
    Dump(#[from] DumpError),

    #[error("Failed to parse triplet dump: {0}")]
    Parse(#[from] ParseError),
}

/// Result type for plugin commands
pub type Result<T> = std::result::Result<T, PluginError>;

/// Render the value report for an already captured dump
pub fn fetch_from_dump(dump_text: &str, now: NaiveDateTime, config: &Config) -> Result<String> {
    let triplets = triplet::parse_dump(dump_text, &config.date_format)?;
    let counts = buckets::classify(&triplets, now, config);
    Ok(report::render_values(&counts, config))
}

/// Run the dump tool and render the value report
pub fn fetch(config: &Config, now: NaiveDateTime) -> Result<String> {
    let dump_text = dump::run(&config.binary_path)?;
    fetch_from_dump(&dump_text, now, config)
}

/// Run one command against the local clock
pub fn execute(command: Command, config: &Config) -> Result<String> {
    tracing::debug!(%command, "executing plugin command");
    match command {
        Command::Config => Ok(report::render_config(config)),
        Command::Autoconf => Ok(Availability::probe(&config.binary_path).render()),
        Command::Fetch => fetch(config, chrono::Local::now().naive_local()),
    }
}
