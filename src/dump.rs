//! Running `greyfix --dump-triplets`

use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

/// Argument asking greyfix to dump its triplet database
pub const DUMP_ARG: &str = "--dump-triplets";

/// Errors from invoking the dump tool
#[derive(Error, Debug)]
pub enum DumpError {
    #[error("Failed to run {path}: {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} exited with status {status}")]
    ToolFailed { path: String, status: i32 },
}

impl DumpError {
    /// Exit status to propagate, if the tool itself failed
    pub fn tool_status(&self) -> Option<i32> {
        match self {
            Self::ToolFailed { status, .. } => Some(*status),
            Self::Spawn { .. } => None,
        }
    }
}

/// Result type for dump invocation
pub type Result<T> = std::result::Result<T, DumpError>;

/// Exit status as a shell would report it (signals become 128 + signal)
fn status_code(status: ExitStatus) -> i32 {
    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(sig)) => 128 + sig,
        (None, None) => 1,
    }
}

/// Run the dump tool and return its captured stdout
///
/// Blocks until the tool exits. Stderr is passed through to ours.
pub fn run(binary_path: &Path) -> Result<String> {
    tracing::debug!(path = %binary_path.display(), "running dump tool");

    let output = Command::new(binary_path)
        .arg(DUMP_ARG)
        .stdin(Stdio::null())
        .stderr(Stdio::inherit())
        .output()
        .map_err(|source| DumpError::Spawn {
            path: binary_path.display().to_string(),
            source,
        })?;

    if !output.status.success() {
        let status = status_code(output.status);
        tracing::warn!(status, "dump tool failed");
        return Err(DumpError::ToolFailed {
            path: binary_path.display().to_string(),
            status,
        });
    }

    tracing::debug!(bytes = output.stdout.len(), "captured dump");
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
