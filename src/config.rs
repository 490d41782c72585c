//! Plugin configuration
//!
//! Munin hands plugin settings over through the process environment
//! (`env.<name>` lines in `plugin-conf.d`). Every setting is optional and
//! overrides a built-in default. Values are parsed once at startup into an
//! immutable [`Config`] that is passed explicitly to every operation.

use std::path::PathBuf;
use thiserror::Error;

/// Default location of the greyfix binary
pub const DEFAULT_BINARY_PATH: &str = "/usr/sbin/greyfix";

/// Default bucket width in days
pub const DEFAULT_STEP_SIZE_DAYS: u32 = 7;

/// Default number of age buckets (excluding the never-passed bucket)
pub const DEFAULT_NUM_STEPS: u32 = 11;

/// Upper bound for `num_steps`; each step is a graph field
pub const MAX_NUM_STEPS: u32 = 1000;

/// Upper bound for `step_size` (100 years)
pub const MAX_STEP_SIZE_DAYS: u32 = 36_500;

/// C-locale `%c` rendering, which greyfix uses for first/last seen
pub const DEFAULT_DATE_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Environment variable names understood by the plugin
pub mod env {
    pub const BINARY_PATH: &str = "greyfix";
    pub const STEP_SIZE: &str = "step_size";
    pub const NUM_STEPS: &str = "num_steps";
    pub const GREYLIST_STEP: &str = "greylist_step";
    pub const DATE_FORMAT: &str = "date_format";
}

/// Errors raised while reading configuration from the environment
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: '{value}' is not an integer")]
    InvalidInteger { name: &'static str, value: String },

    #[error("Invalid value for {name}: {value} (must be between {min} and {max})")]
    OutOfRange {
        name: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("Invalid value for {name}: '{value}' (expected 'yes' or 'no')")]
    InvalidFlag { name: &'static str, value: String },

    #[error("Invalid value for {name}: must not be empty")]
    Empty { name: &'static str },
}

/// Result type for configuration parsing
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Immutable plugin configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path to the greyfix binary
    pub binary_path: PathBuf,
    /// Width of each age bucket in days (>= 1)
    pub step_size_days: u32,
    /// Number of age buckets (>= 1); the last one is unbounded
    pub num_steps: u32,
    /// Count never-passed triplets in their own `gl` bucket
    pub separate_never_passed_bucket: bool,
    /// chrono format string matching greyfix's timestamp rendering
    pub date_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            binary_path: PathBuf::from(DEFAULT_BINARY_PATH),
            step_size_days: DEFAULT_STEP_SIZE_DAYS,
            num_steps: DEFAULT_NUM_STEPS,
            separate_never_passed_bucket: true,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl Config {
    /// Build the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    ///
    /// Unset variables keep their defaults. A variable that is set but holds
    /// a value of the wrong shape is an error rather than being ignored.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(env::BINARY_PATH) {
            if path.is_empty() {
                return Err(ConfigError::Empty {
                    name: env::BINARY_PATH,
                });
            }
            config.binary_path = PathBuf::from(path);
        }
        if let Some(value) = lookup(env::STEP_SIZE) {
            config.step_size_days = parse_bounded(env::STEP_SIZE, &value, MAX_STEP_SIZE_DAYS)?;
        }
        if let Some(value) = lookup(env::NUM_STEPS) {
            config.num_steps = parse_bounded(env::NUM_STEPS, &value, MAX_NUM_STEPS)?;
        }
        if let Some(value) = lookup(env::GREYLIST_STEP) {
            config.separate_never_passed_bucket = parse_flag(env::GREYLIST_STEP, &value)?;
        }
        if let Some(format) = lookup(env::DATE_FORMAT) {
            if format.trim().is_empty() {
                return Err(ConfigError::Empty {
                    name: env::DATE_FORMAT,
                });
            }
            config.date_format = format;
        }

        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }
}

/// Parse a digit-only value into an integer in `1..=max`
fn parse_bounded(name: &'static str, value: &str, max: u32) -> Result<u32> {
    let trimmed = value.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ConfigError::InvalidInteger {
            name,
            value: value.to_string(),
        });
    }
    let parsed: u32 = trimmed.parse().map_err(|_| ConfigError::InvalidInteger {
        name,
        value: value.to_string(),
    })?;
    if !(1..=max).contains(&parsed) {
        return Err(ConfigError::OutOfRange {
            name,
            value: parsed,
            min: 1,
            max,
        });
    }
    Ok(parsed)
}

/// Parse a case-sensitive `yes`/`no` flag
fn parse_flag(name: &'static str, value: &str) -> Result<bool> {
    match value {
        "yes" => Ok(true),
        "no" => Ok(false),
        other => Err(ConfigError::InvalidFlag {
            name,
            value: other.to_string(),
        }),
    }
}
