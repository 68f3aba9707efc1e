//! Immutable source file snapshots.
//!
//! A [`SourceFile`] holds the raw text of a file together with its lines.
//! Lines are zero-indexed internally; reports add one when presenting them.
//! Rewrites never mutate a snapshot: they render a new text from a modified
//! copy of the lines via [`SourceFile::render`].

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::SyntaxError;

/// Line ending style inferred from file content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineEnding {
    /// Line feed (`\n`).
    Lf,
    /// Carriage return + line feed (`\r\n`).
    CrLf,
}

impl LineEnding {
    /// Returns the separator text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }

    /// Picks the dominant line ending of `content`, defaulting to LF.
    #[must_use]
    pub fn dominant(content: &str) -> Self {
        let mut crlf: usize = 0;
        let mut lf: usize = 0;
        let mut previous = None;
        for byte in content.bytes() {
            if byte == b'\n' {
                if previous == Some(b'\r') {
                    crlf += 1;
                } else {
                    lf += 1;
                }
            }
            previous = Some(byte);
        }

        if crlf > 0 && crlf >= lf {
            Self::CrLf
        } else {
            Self::Lf
        }
    }
}

/// A read-only snapshot of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: PathBuf,
    text: String,
    lines: Vec<String>,
    line_ending: LineEnding,
    trailing_newline: bool,
}

impl SourceFile {
    /// Builds a snapshot from in-memory text.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let raw: String = text.into();
        let line_ending = LineEnding::dominant(&raw);
        let trailing_newline = raw.ends_with('\n');
        let body = raw.strip_suffix('\n').unwrap_or(&raw);
        let lines = if raw.is_empty() {
            Vec::new()
        } else {
            body.split('\n')
                .map(|line| line.strip_suffix('\r').unwrap_or(line).to_owned())
                .collect()
        };

        Self {
            path: path.into(),
            text: raw,
            lines,
            line_ending,
            trailing_newline,
        }
    }

    /// Reads a snapshot from disk.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::ReadError`] when the file cannot be read as
    /// UTF-8 text.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, SyntaxError> {
        let target = path.as_ref();
        let text =
            std::fs::read_to_string(target).map_err(|source| SyntaxError::read(target, source))?;
        Ok(Self::new(target, text))
    }

    /// Path the snapshot was read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw text, byte-for-byte as read.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Lines without their terminators.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Returns the zero-based line `index`, if present.
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Number of lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Dominant line ending of the file.
    #[must_use]
    pub const fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Whether the text ends with a line terminator.
    #[must_use]
    pub const fn ends_with_newline(&self) -> bool {
        self.trailing_newline
    }

    /// Joins `lines` using this file's line ending and trailing newline
    /// convention.
    #[must_use]
    pub fn render<S: AsRef<str>>(&self, lines: &[S]) -> String {
        let separator = self.line_ending.as_str();
        let mut out = lines
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(separator);
        if self.trailing_newline && !lines.is_empty() {
            out.push_str(separator);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", 0)]
    #[case("a", 1)]
    #[case("a\n", 1)]
    #[case("a\nb\n", 2)]
    #[case("a\r\nb", 2)]
    #[case("\n", 1)]
    fn counts_lines(#[case] text: &str, #[case] expected: usize) {
        let file = SourceFile::new("f.tsx", text);
        assert_eq!(file.line_count(), expected);
    }

    #[rstest]
    #[case("a\nb\n")]
    #[case("a\r\nb\r\n")]
    #[case("a\nb")]
    #[case("x\r\n\r\ny")]
    fn render_round_trips_untouched_lines(#[case] text: &str) {
        let file = SourceFile::new("f.tsx", text);
        assert_eq!(file.render(file.lines()), text);
    }

    #[test]
    fn strips_carriage_returns_from_lines() {
        let file = SourceFile::new("f.tsx", "one\r\ntwo\r\n");
        assert_eq!(file.line(0), Some("one"));
        assert_eq!(file.line_ending(), LineEnding::CrLf);
    }

    #[test]
    fn read_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let error = SourceFile::read(dir.path().join("nope.tsx")).expect_err("missing");
        assert!(matches!(error, SyntaxError::ReadError { .. }));
    }
}
