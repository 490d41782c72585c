//! Greylisting triplets and the `greyfix --dump-triplets` parser
//!
//! Each dump line is seven tab-separated fields:
//!
//! ```text
//! sender_ip  sender_email  recipient_email  first_seen  last_seen  block_count  pass_count
//! ```
//!
//! Lines with any other field count are skipped. Timestamps are greyfix's
//! locale `%c` rendering, parsed with the configured chrono format.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Number of tab-separated fields in a valid dump line
pub const FIELD_COUNT: usize = 7;

/// Errors for dump lines with the right shape but unparseable values
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: invalid {field} timestamp '{value}' (format '{format}')")]
    InvalidTimestamp {
        line: usize,
        field: &'static str,
        value: String,
        format: String,
    },

    #[error("line {line}: invalid {field} '{value}'")]
    InvalidCount {
        line: usize,
        field: &'static str,
        value: String,
    },
}

/// Result type for dump parsing
pub type Result<T> = std::result::Result<T, ParseError>;

/// One greylisting record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triplet {
    pub sender_ip: String,
    pub sender_email: String,
    pub recipient_email: String,
    /// When greyfix first saw this triplet (local time)
    pub first_seen: NaiveDateTime,
    /// When greyfix last saw this triplet (local time)
    pub last_seen: NaiveDateTime,
    /// Number of deferred delivery attempts
    pub block_count: u64,
    /// Number of attempts let through
    pub pass_count: u64,
}

impl Triplet {
    /// True if the triplet has never been let through
    pub fn never_passed(&self) -> bool {
        self.pass_count == 0
    }
}

/// Parse a full dump, skipping lines that do not have seven fields
pub fn parse_dump(text: &str, date_format: &str) -> Result<Vec<Triplet>> {
    let mut triplets = Vec::new();
    let mut skipped = 0usize;

    for (index, line) in text.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        match parse_line(line, index + 1, date_format)? {
            Some(triplet) => triplets.push(triplet),
            None => {
                if !line.is_empty() {
                    tracing::trace!(line = index + 1, "skipping malformed dump line");
                    skipped += 1;
                }
            }
        }
    }

    tracing::debug!(parsed = triplets.len(), skipped, "parsed triplet dump");
    Ok(triplets)
}

/// Parse one dump line; `Ok(None)` when the field count is wrong
pub fn parse_line(line: &str, line_no: usize, date_format: &str) -> Result<Option<Triplet>> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != FIELD_COUNT {
        return Ok(None);
    }

    Ok(Some(Triplet {
        sender_ip: fields[0].to_string(),
        sender_email: fields[1].to_string(),
        recipient_email: fields[2].to_string(),
        first_seen: parse_timestamp(fields[3], line_no, "first_seen", date_format)?,
        last_seen: parse_timestamp(fields[4], line_no, "last_seen", date_format)?,
        block_count: parse_count(fields[5], line_no, "block_count")?,
        pass_count: parse_count(fields[6], line_no, "pass_count")?,
    }))
}

fn parse_timestamp(
    value: &str,
    line: usize,
    field: &'static str,
    format: &str,
) -> Result<NaiveDateTime> {
    // `%c` pads single-digit days with a space ("Oct  5")
    let normalized = value.split_whitespace().collect::<Vec<_>>().join(" ");
    NaiveDateTime::parse_from_str(&normalized, format).map_err(|_| {
        ParseError::InvalidTimestamp {
            line,
            field,
            value: value.to_string(),
            format: format.to_string(),
        }
    })
}

fn parse_count(value: &str, line: usize, field: &'static str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ParseError::InvalidCount {
            line,
            field,
            value: value.to_string(),
        })
}
