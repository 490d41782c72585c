//! greyfix-age - Munin plugin for greyfix triplet ages
//!
//! This library parses the triplet dump of the greyfix greylisting daemon,
//! buckets triplets by the number of days since they were first seen, and
//! renders the Munin `config`, `fetch` and `autoconf` reports.

pub mod buckets;
pub mod cli;
pub mod config;
pub mod dump;
pub mod exit_codes;
pub mod plugin;
pub mod report;
pub mod triplet;
