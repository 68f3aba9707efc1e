//! The verifier: a side-effect-free acceptance check.
//!
//! Verification re-indexes and re-detects a file, optionally keeps only the
//! violations touching caller-supplied lines, and evaluates per-line
//! substring expectations. It never writes, so it can run any number of
//! times.

use std::path::{Path, PathBuf};

use serde::Serialize;
use shadowfix_syntax::{SourceFile, SyntaxError, index_blocks};
use tracing::debug;

use crate::detector::detect;
use crate::violation::ShadowViolation;

const VERIFIER_TARGET: &str = "shadowfix_rules::verifier";

/// Whether a line should or should not contain some text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectationMode {
    /// The line must contain the text.
    Contains,
    /// The line must not contain the text.
    Absent,
}

/// A substring expectation on one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineExpectation {
    line: usize,
    text: String,
    mode: ExpectationMode,
}

impl LineExpectation {
    /// Creates an expectation on one-based `line`.
    #[must_use]
    pub fn new(line: usize, text: impl Into<String>, mode: ExpectationMode) -> Self {
        Self {
            line,
            text: text.into(),
            mode,
        }
    }

    /// One-based line checked.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Substring looked for.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the text must be present or absent.
    #[must_use]
    pub const fn mode(&self) -> ExpectationMode {
        self.mode
    }

    fn holds_for(&self, actual: Option<&str>) -> bool {
        match (self.mode, actual) {
            (ExpectationMode::Contains, Some(line)) => line.contains(&self.text),
            (ExpectationMode::Contains, None) => false,
            (ExpectationMode::Absent, line) => !line.is_some_and(|text| text.contains(&self.text)),
        }
    }
}

/// What to verify beyond "no residual violations".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyRequest {
    lines: Vec<usize>,
    expectations: Vec<LineExpectation>,
}

impl VerifyRequest {
    /// Checks the whole file with no expectations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts residual violations to those touching one-based `lines`.
    #[must_use]
    pub fn with_lines(mut self, lines: impl IntoIterator<Item = usize>) -> Self {
        self.lines.extend(lines);
        self
    }

    /// Adds an expectation.
    #[must_use]
    pub fn expect(mut self, expectation: LineExpectation) -> Self {
        self.expectations.push(expectation);
        self
    }

    /// Requires `text` on one-based `line`.
    #[must_use]
    pub fn expect_contains(self, line: usize, text: impl Into<String>) -> Self {
        self.expect(LineExpectation::new(line, text, ExpectationMode::Contains))
    }

    /// Forbids `text` on one-based `line`.
    #[must_use]
    pub fn expect_absent(self, line: usize, text: impl Into<String>) -> Self {
        self.expect(LineExpectation::new(line, text, ExpectationMode::Absent))
    }
}

/// Outcome of one expectation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpectationResult {
    #[serde(flatten)]
    expectation: LineExpectation,
    passed: bool,
    actual: Option<String>,
}

impl ExpectationResult {
    /// The expectation evaluated.
    #[must_use]
    pub const fn expectation(&self) -> &LineExpectation {
        &self.expectation
    }

    /// Whether it held.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.passed
    }

    /// The line as found, if it exists.
    #[must_use]
    pub fn actual(&self) -> Option<&str> {
        self.actual.as_deref()
    }
}

/// Residual violations and expectation outcomes for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    path: PathBuf,
    violations: Vec<ShadowViolation>,
    expectations: Vec<ExpectationResult>,
}

impl VerificationReport {
    /// File verified.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Violations still present.
    #[must_use]
    pub fn violations(&self) -> &[ShadowViolation] {
        &self.violations
    }

    /// Expectation outcomes, in request order.
    #[must_use]
    pub fn expectations(&self) -> &[ExpectationResult] {
        &self.expectations
    }

    /// Expectations that did not hold.
    pub fn failed_expectations(&self) -> impl Iterator<Item = &ExpectationResult> {
        self.expectations.iter().filter(|result| !result.passed)
    }

    /// Whether nothing is left to fix.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty() && self.expectations.iter().all(ExpectationResult::passed)
    }
}

/// Verifies an in-memory snapshot.
///
/// # Errors
///
/// Returns the structural [`SyntaxError`] raised by indexing.
pub fn verify(
    source: &SourceFile,
    request: &VerifyRequest,
) -> Result<VerificationReport, SyntaxError> {
    let index = index_blocks(source)?;
    let violations: Vec<ShadowViolation> = detect(source, &index)
        .into_iter()
        .filter(|violation| {
            request.lines.is_empty()
                || request
                    .lines
                    .iter()
                    .any(|line| violation.covers_display_line(*line))
        })
        .collect();

    let expectations = request
        .expectations
        .iter()
        .map(|expectation| {
            let actual = expectation
                .line
                .checked_sub(1)
                .and_then(|index| source.line(index));
            ExpectationResult {
                expectation: expectation.clone(),
                passed: expectation.holds_for(actual),
                actual: actual.map(str::to_owned),
            }
        })
        .collect();

    let report = VerificationReport {
        path: source.path().to_path_buf(),
        violations,
        expectations,
    };
    debug!(
        target: VERIFIER_TARGET,
        path = %report.path.display(),
        clean = report.is_clean(),
        "verification complete"
    );
    Ok(report)
}

/// Reads and verifies the file at `path`.
///
/// # Errors
///
/// Returns [`SyntaxError::ReadError`] when the file cannot be read, or the
/// structural error raised by indexing.
pub fn verify_path(
    path: impl AsRef<Path>,
    request: &VerifyRequest,
) -> Result<VerificationReport, SyntaxError> {
    verify(&SourceFile::read(path)?, request)
}
