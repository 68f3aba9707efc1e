//! Error types for the safe writer.
//!
//! Stale and conflicting patches are structural errors: the file changed
//! between planning and writing, or the plan itself is inconsistent. Either
//! way nothing is written. The remaining variants wrap I/O failures with the
//! path that caused them.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors surfaced by the safe writer.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// A patch's recorded text no longer matches the file.
    #[error(
        "stale patch for {} at line {line}: expected {expected:?}, found {found:?}",
        path.display()
    )]
    StalePatch {
        /// File the patch targets.
        path: PathBuf,
        /// One-based line the patch is anchored on.
        line: usize,
        /// Text recorded when the patch was planned.
        expected: String,
        /// Text currently on disk, if the line still exists.
        found: Option<String>,
    },

    /// Two patches target the same line.
    #[error("conflicting patches for {} at line {line}", path.display())]
    ConflictingPatches {
        /// File the patches target.
        path: PathBuf,
        /// One-based line targeted twice.
        line: usize,
    },

    /// The target file could not be read.
    #[error("failed to read file {}: {message}", path.display())]
    FileReadError {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The backup could not be created.
    #[error("failed to write backup {}: {message}", path.display())]
    BackupError {
        /// Path of the backup file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The rewritten content could not be written.
    #[error("failed to write file {}: {message}", path.display())]
    FileWriteError {
        /// Path to the file that could not be written.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },
}

impl HarnessError {
    /// Creates a file read error.
    #[must_use]
    pub fn file_read(path: &Path, message: impl Into<String>) -> Self {
        Self::FileReadError {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Creates a backup error.
    #[must_use]
    pub fn backup(path: PathBuf, error: &std::io::Error) -> Self {
        Self::BackupError {
            path,
            message: error.to_string(),
        }
    }

    /// Creates a file write error.
    #[must_use]
    pub fn file_write(path: &Path, error: &std::io::Error) -> Self {
        Self::FileWriteError {
            path: path.to_path_buf(),
            message: error.to_string(),
        }
    }

    /// Whether the error stems from the patches rather than from I/O.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::StalePatch { .. } | Self::ConflictingPatches { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_patch_displays_location_and_texts() {
        let error = HarnessError::StalePatch {
            path: PathBuf::from("src/Card.tsx"),
            line: 4,
            expected: String::from("  card: {"),
            found: Some(String::from("  cards: {")),
        };

        let display = error.to_string();
        assert!(display.contains("src/Card.tsx"));
        assert!(display.contains("line 4"));
        assert!(display.contains("cards"));
        assert!(error.is_structural());
    }
}
