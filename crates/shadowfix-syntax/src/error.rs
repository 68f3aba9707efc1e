//! Error types for source loading and style-block indexing.
//!
//! Structural errors (unterminated blocks, stray closing braces, an index
//! whose blocks overlap) are fatal to the single file being indexed. Callers
//! processing many files report them and move on to the next file.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors from reading and indexing a source file.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum SyntaxError {
    /// The source file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    ReadError {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// A named block was still open when the end of the file was reached.
    #[error("style block '{name}' opened on line {line} is never closed")]
    UnterminatedBlock {
        /// Name captured at the opening line.
        name: String,
        /// One-based line of the opening brace.
        line: usize,
    },

    /// A closing brace appeared with no matching opening brace.
    #[error("unbalanced closing brace on line {line}")]
    UnbalancedClose {
        /// One-based line of the stray brace.
        line: usize,
    },

    /// The produced blocks were out of order or overlapped.
    #[error("style block '{name}' on line {line} overlaps the previous block")]
    OverlappingBlocks {
        /// Name of the offending block.
        name: String,
        /// One-based start line of the offending block.
        line: usize,
    },
}

impl SyntaxError {
    /// Creates a read error for `path`.
    #[must_use]
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    /// Creates an unterminated block error. `line` is zero-based.
    #[must_use]
    pub fn unterminated(name: impl Into<String>, line: usize) -> Self {
        Self::UnterminatedBlock {
            name: name.into(),
            line: line.saturating_add(1),
        }
    }

    /// Creates an unbalanced close error. `line` is zero-based.
    #[must_use]
    pub const fn unbalanced_close(line: usize) -> Self {
        Self::UnbalancedClose {
            line: line.saturating_add(1),
        }
    }

    /// Returns whether this error describes the structure of the text rather
    /// than a failure to read it.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        !matches!(self, Self::ReadError { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unterminated_reports_one_based_line() {
        let error = SyntaxError::unterminated("card", 0);
        assert_eq!(
            error.to_string(),
            "style block 'card' opened on line 1 is never closed"
        );
        assert!(error.is_structural());
    }

    #[test]
    fn read_errors_are_not_structural() {
        let error = SyntaxError::read(
            "missing.tsx",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(!error.is_structural());
        assert!(error.to_string().contains("missing.tsx"));
    }
}
