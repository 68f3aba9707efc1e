//! Errors raised while running fix scripts.
//!
//! I/O errors are wrapped in `Arc` so the enum stays `Clone` and small.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors arising from the sequential script runner.
#[derive(Debug, Clone, Error)]
pub enum RunnerError {
    /// A script in the run list does not exist. Nothing was run.
    #[error("fix script not found: {}", path.display())]
    ScriptNotFound {
        /// Path that was checked.
        path: PathBuf,
    },

    /// The script process could not be started.
    #[error("fix script '{script}' failed to start: {message}")]
    SpawnFailed {
        /// Script name.
        script: String,
        /// Human-readable failure description.
        message: String,
        /// Underlying I/O error.
        #[source]
        source: Option<Arc<std::io::Error>>,
    },

    /// The script exited unsuccessfully. Later scripts were not run.
    #[error("fix script '{script}' failed with {}", describe_status(*status))]
    NonZeroExit {
        /// Script name.
        script: String,
        /// Exit code, absent when the process was killed by a signal.
        status: Option<i32>,
        /// Captured standard output.
        stdout: String,
        /// Captured standard error.
        stderr: String,
    },

    /// The script exited with status zero but wrote to its error stream.
    /// Later scripts were not run.
    #[error("fix script '{script}' wrote to stderr")]
    StderrOutput {
        /// Script name.
        script: String,
        /// Captured standard output.
        stdout: String,
        /// Captured standard error.
        stderr: String,
    },
}

impl RunnerError {
    /// Creates a spawn error from an I/O failure.
    #[must_use]
    pub fn spawn(script: impl Into<String>, error: std::io::Error) -> Self {
        Self::SpawnFailed {
            script: script.into(),
            message: error.to_string(),
            source: Some(Arc::new(error)),
        }
    }

    /// Name of the script involved, when one ran.
    #[must_use]
    pub fn script(&self) -> Option<&str> {
        match self {
            Self::ScriptNotFound { .. } => None,
            Self::SpawnFailed { script, .. }
            | Self::NonZeroExit { script, .. }
            | Self::StderrOutput { script, .. } => Some(script),
        }
    }
}

fn describe_status(status: Option<i32>) -> String {
    status.map_or_else(
        || String::from("no exit status (terminated by signal)"),
        |code| format!("exit status {code}"),
    )
}
