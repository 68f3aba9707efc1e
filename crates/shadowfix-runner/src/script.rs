//! Fix scripts and their captured output.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// A fix script on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixScript {
    path: PathBuf,
}

impl FixScript {
    /// Wraps the script at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path to the script.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name used in reports, falling back to the full path.
    #[must_use]
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(|| self.path.display().to_string(), |name| name.to_string_lossy().into_owned())
    }
}

/// Exit status and captured streams of one script run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ScriptOutput {
    /// Exit code, absent when the process was killed by a signal.
    pub status: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl ScriptOutput {
    /// Output of a run that exited with status zero.
    #[must_use]
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Whether the script exited with status zero.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        matches!(self.status, Some(0))
    }
}

/// A script that completed successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptRun {
    /// Script name.
    pub script: String,
    /// Captured standard output.
    pub stdout: String,
}
