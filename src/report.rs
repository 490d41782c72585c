//! Munin protocol output for `config`, `fetch` and `autoconf`
//!
//! Output is line-oriented `key value` pairs. Field names come from
//! [`crate::buckets::layout`] in both the config and value reports.

use crate::buckets::{self, BucketCounts, NEVER_PASSED_FIELD};
use crate::config::Config;
use std::path::Path;

/// Draw style for every field; buckets stack into the total
const DRAW_STYLE: &str = "AREASTACK";

/// Fixed colour for the never-passed bucket
const NEVER_PASSED_COLOUR: &str = "000000";

/// Chart preamble
const GRAPH_PREAMBLE: &[(&str, &str)] = &[
    ("graph_title", "Greylisting triplets by age"),
    ("graph_vlabel", "triplets"),
    (
        "graph_info",
        "Age distribution of greyfix triplets, bucketed by days since first seen",
    ),
    ("graph_category", "mail"),
    ("graph_total", "Total"),
    ("graph_args", "--base 1000 -l 0"),
];

fn push_line(output: &mut String, key: &str, value: &str) {
    output.push_str(key);
    output.push(' ');
    output.push_str(value);
    output.push('\n');
}

/// Render the `config` report (chart and field metadata)
pub fn render_config(config: &Config) -> String {
    let mut output = String::new();

    for (key, value) in GRAPH_PREAMBLE {
        push_line(&mut output, key, value);
    }

    if config.separate_never_passed_bucket {
        let field = NEVER_PASSED_FIELD;
        push_line(&mut output, &format!("{}.label", field), "Greylisted");
        push_line(
            &mut output,
            &format!("{}.info", field),
            "Triplets that have never been let through",
        );
        push_line(&mut output, &format!("{}.draw", field), DRAW_STYLE);
        push_line(&mut output, &format!("{}.colour", field), NEVER_PASSED_COLOUR);
    }

    for bucket in buckets::layout(config) {
        let field = bucket.field_name();
        push_line(
            &mut output,
            &format!("{}.label", field),
            &format!("Whitelisted for {} days", bucket.range_label()),
        );
        let info = if bucket.is_open_ended() {
            format!(
                "Triplets first seen {} or more days ago",
                bucket.start_day
            )
        } else {
            format!(
                "Triplets first seen between {} days ago",
                bucket.range_label().replace(" - ", " and ")
            )
        };
        push_line(&mut output, &format!("{}.info", field), &info);
        push_line(&mut output, &format!("{}.draw", field), DRAW_STYLE);
    }

    output
}

/// Render the `fetch` report (current values)
pub fn render_values(counts: &BucketCounts, config: &Config) -> String {
    let mut output = String::new();

    if let Some(never_passed) = counts.never_passed {
        push_line(
            &mut output,
            &format!("{}.value", NEVER_PASSED_FIELD),
            &never_passed.to_string(),
        );
    }

    for bucket in buckets::layout(config) {
        let count = counts.age.get(bucket.index as usize).copied().unwrap_or(0);
        push_line(
            &mut output,
            &format!("{}.value", bucket.field_name()),
            &count.to_string(),
        );
    }

    output
}

/// Result of the `autoconf` probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable { reason: String },
}

impl Availability {
    /// Probe whether the greyfix binary is present
    pub fn probe(binary_path: &Path) -> Self {
        if binary_path.exists() {
            Self::Available
        } else {
            Self::Unavailable {
                reason: format!("{} not found", binary_path.display()),
            }
        }
    }

    /// Render as the Munin `autoconf` answer
    pub fn render(&self) -> String {
        match self {
            Self::Available => "yes\n".to_string(),
            Self::Unavailable { reason } => format!("no ({})\n", reason),
        }
    }
}

/// Render a diagnostic comment line
pub fn comment(message: &str) -> String {
    format!("# {}\n", message)
}
