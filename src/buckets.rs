//! Age buckets and triplet classification
//!
//! Bucket `i` covers `[step * i, step * (i + 1) - 1]` days since first seen.
//! The last bucket has no upper bound. Field names are derived purely from
//! the bucket index and configuration, so `config` and `fetch` always agree.

use crate::config::Config;
use crate::triplet::Triplet;
use chrono::NaiveDateTime;

/// Field name of the never-passed bucket
pub const NEVER_PASSED_FIELD: &str = "gl";

const SECONDS_PER_DAY: i64 = 86_400;

/// One age bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub index: u32,
    /// First day (inclusive) covered by this bucket
    pub start_day: u64,
    /// Last day (inclusive), `None` for the open-ended last bucket
    pub end_day: Option<u64>,
}

impl Bucket {
    /// Munin field name, e.g. `d0_6` or `d70_`
    pub fn field_name(&self) -> String {
        match self.end_day {
            Some(end) => format!("d{}_{}", self.start_day, end),
            None => format!("d{}_", self.start_day),
        }
    }

    /// Human-readable day range, e.g. `0 - 6` or `70 - ...`
    pub fn range_label(&self) -> String {
        match self.end_day {
            Some(end) => format!("{} - {}", self.start_day, end),
            None => format!("{} - ...", self.start_day),
        }
    }

    /// True for the last, unbounded bucket
    pub fn is_open_ended(&self) -> bool {
        self.end_day.is_none()
    }
}

/// All age buckets for a configuration, in index order
pub fn layout(config: &Config) -> Vec<Bucket> {
    let step = u64::from(config.step_size_days);
    (0..config.num_steps)
        .map(|index| {
            let start_day = step * u64::from(index);
            let end_day = if index + 1 == config.num_steps {
                None
            } else {
                Some(start_day + step - 1)
            };
            Bucket {
                index,
                start_day,
                end_day,
            }
        })
        .collect()
}

/// Whole days between `first_seen` and `now`, rounded toward negative infinity
pub fn age_in_days(first_seen: NaiveDateTime, now: NaiveDateTime) -> i64 {
    now.signed_duration_since(first_seen)
        .num_seconds()
        .div_euclid(SECONDS_PER_DAY)
}

/// Bucket index for an age in days
///
/// Ages past the last bounded bucket go to the last bucket. Negative ages
/// (first seen in the future) go to bucket 0.
pub fn bucket_index(age_days: i64, step_size_days: u32, num_steps: u32) -> usize {
    let last = num_steps.saturating_sub(1) as usize;
    if age_days < 0 {
        return 0;
    }
    let index = age_days.div_euclid(i64::from(step_size_days.max(1)));
    usize::try_from(index).map_or(last, |i| i.min(last))
}

/// Per-bucket triplet counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketCounts {
    /// Counts for age buckets `0..num_steps`
    pub age: Vec<u64>,
    /// Never-passed count, `None` when that bucket is disabled
    pub never_passed: Option<u64>,
}

impl BucketCounts {
    /// All-zero counts for a configuration
    pub fn new(config: &Config) -> Self {
        Self {
            age: vec![0; config.num_steps as usize],
            never_passed: config.separate_never_passed_bucket.then_some(0),
        }
    }

    /// Total number of classified triplets
    pub fn total(&self) -> u64 {
        self.age.iter().sum::<u64>() + self.never_passed.unwrap_or(0)
    }
}

/// Classify triplets into buckets relative to `now`
pub fn classify(triplets: &[Triplet], now: NaiveDateTime, config: &Config) -> BucketCounts {
    let mut counts = BucketCounts::new(config);

    for triplet in triplets {
        if let Some(never_passed) = counts.never_passed.as_mut() {
            if triplet.never_passed() {
                *never_passed += 1;
                continue;
            }
        }

        let age = age_in_days(triplet.first_seen, now);
        if age < 0 {
            tracing::debug!(
                first_seen = %triplet.first_seen,
                %now,
                "triplet first seen in the future, counting as age 0"
            );
        }
        let index = bucket_index(age, config.step_size_days, config.num_steps);
        counts.age[index] += 1;
    }

    tracing::debug!(total = counts.total(), "classified triplets");
    counts
}
