//! Report models shared by the human and JSON renderers.

use std::path::PathBuf;

use serde::Serialize;
use shadowfix_harness::{RewritePatch, WriteOutcome};
use shadowfix_rules::{PlanNote, ShadowViolation, VerificationReport, ViolationKind};
use shadowfix_runner::{RunSummary, RunnerError, ScriptRun};

/// One violation, as reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ViolationRecord {
    pub(crate) line: usize,
    pub(crate) kind: ViolationKind,
    pub(crate) evidence: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) block: Option<String>,
}

impl From<&ShadowViolation> for ViolationRecord {
    fn from(violation: &ShadowViolation) -> Self {
        Self {
            line: violation.display_line(),
            kind: violation.kind(),
            evidence: violation.evidence().to_owned(),
            block: violation.block().map(|block| block.name().to_owned()),
        }
    }
}

/// A file that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct FileError {
    pub(crate) path: PathBuf,
    pub(crate) message: String,
}

/// Violations found in one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct FileScan {
    pub(crate) path: PathBuf,
    pub(crate) violations: Vec<ViolationRecord>,
}

/// Result of `scan`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub(crate) struct ScanReport {
    pub(crate) files: Vec<FileScan>,
    pub(crate) files_scanned: usize,
    pub(crate) missing: Vec<PathBuf>,
    pub(crate) errors: Vec<FileError>,
}

impl ScanReport {
    pub(crate) fn total_violations(&self) -> usize {
        self.files.iter().map(|file| file.violations.len()).sum()
    }

    pub(crate) fn is_clean(&self) -> bool {
        self.total_violations() == 0 && self.errors.is_empty()
    }
}

/// What `fix` did to one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct FileFix {
    pub(crate) path: PathBuf,
    pub(crate) violations: Vec<ViolationRecord>,
    pub(crate) patches: Vec<RewritePatch>,
    pub(crate) notes: Vec<PlanNote>,
    /// Absent on a dry run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) outcome: Option<WriteOutcome>,
    /// Absent on a dry run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) verification: Option<VerificationReport>,
}

impl FileFix {
    pub(crate) fn residual(&self) -> usize {
        self.verification
            .as_ref()
            .map_or(0, |report| report.violations().len())
    }
}

/// Result of `fix`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub(crate) struct FixReport {
    pub(crate) dry_run: bool,
    pub(crate) files: Vec<FileFix>,
    pub(crate) files_scanned: usize,
    pub(crate) missing: Vec<PathBuf>,
    pub(crate) errors: Vec<FileError>,
}

impl FixReport {
    pub(crate) fn files_written(&self) -> usize {
        self.files
            .iter()
            .filter(|file| file.outcome.as_ref().is_some_and(|o| o.backup().is_some()))
            .count()
    }

    pub(crate) fn residual_violations(&self) -> usize {
        self.files.iter().map(FileFix::residual).sum()
    }

    pub(crate) fn succeeded(&self) -> bool {
        self.errors.is_empty() && self.residual_violations() == 0
    }
}

/// Result of `run-all`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub(crate) enum RunReport {
    Completed {
        runs: Vec<ScriptRun>,
        next_steps: Vec<String>,
    },
    Failed {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        script: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        stdout: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        stderr: Option<String>,
    },
}

impl RunReport {
    pub(crate) fn completed(summary: &RunSummary) -> Self {
        Self::Completed {
            runs: summary.runs().to_vec(),
            next_steps: summary
                .next_steps()
                .iter()
                .map(|step| (*step).to_owned())
                .collect(),
        }
    }

    pub(crate) fn failed(error: &RunnerError) -> Self {
        let (stdout, stderr) = match error {
            RunnerError::NonZeroExit { stdout, stderr, .. }
            | RunnerError::StderrOutput { stdout, stderr, .. } => {
                (Some(stdout.clone()), Some(stderr.clone()))
            }
            RunnerError::ScriptNotFound { .. } | RunnerError::SpawnFailed { .. } => (None, None),
        };
        Self::Failed {
            message: error.to_string(),
            script: error.script().map(str::to_owned),
            stdout,
            stderr,
        }
    }
}
