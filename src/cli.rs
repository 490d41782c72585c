//! CLI argument parsing for greyfix-age
//!
//! Munin runs plugins as `plugin [command]`. The command is taken as a
//! free-form positional so an unknown one can be answered with a protocol
//! comment and exit status 1 instead of clap's usage error.

use clap::Parser;
use std::fmt;
use std::str::FromStr;

/// Plugin commands understood by the monitoring host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// Report current bucket values (default)
    #[default]
    Fetch,
    /// Report whether the plugin can run on this host
    Autoconf,
    /// Report chart and field metadata
    Config,
}

impl Command {
    /// All commands, in the order they are listed to users
    pub const ALL: [Command; 3] = [Command::Fetch, Command::Autoconf, Command::Config];

    pub fn as_str(self) -> &'static str {
        match self {
            Command::Fetch => "fetch",
            Command::Autoconf => "autoconf",
            Command::Config => "config",
        }
    }

    /// Comma-separated list of valid command names
    pub fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized plugin command
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown command '{0}'. Valid commands: {}", Command::valid_names())]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}

#[derive(Parser, Debug)]
#[command(name = "greyfix-age")]
#[command(version)]
#[command(
    about = "Munin plugin graphing the age of greyfix greylisting triplets",
    long_about = None
)]
pub struct Cli {
    /// Plugin command: fetch, autoconf or config (default: fetch)
    #[arg(value_name = "COMMAND")]
    pub command: Option<String>,

    /// Enable debug logging to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Resolve the requested command, defaulting to `fetch`
    pub fn command(&self) -> Result<Command, UnknownCommand> {
        match self.command.as_deref() {
            None => Ok(Command::default()),
            Some(name) => name.parse(),
        }
    }
}
