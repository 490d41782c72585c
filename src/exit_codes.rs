//! Exit codes for the plugin
//!
//! A failing dump tool is the exception: its own status is propagated
//! unchanged rather than mapped to one of these.

/// Exit codes for plugin invocations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Report written
    Success = 0,

    /// Unknown command, bad configuration, unparseable dump
    Failure = 1,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}
