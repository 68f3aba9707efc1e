//! Sequential execution of a fixed list of fix scripts.
//!
//! Every script must exist before anything runs. Scripts then run one at a
//! time, each awaited to completion, so a later script may rely on the
//! changes of an earlier one. A script fails when it exits non-zero or writes
//! to stderr. The first failure stops the sequence; nothing is rolled back.

use serde::Serialize;
use tracing::{info, warn};

use crate::error::RunnerError;
use crate::script::{FixScript, ScriptOutput, ScriptRun};

const RUNNER_TARGET: &str = "shadowfix_runner::runner";

/// Checklist printed after every script succeeded.
pub const NEXT_STEPS: [&str; 5] = [
    "Review the changes with `git diff` before committing",
    "Run `shadowfix scan` to confirm no shadow violations remain",
    "Launch the app on iOS and check that every shadow renders",
    "Launch the app on Android and check elevation on every card",
    "Delete the *.backup_* files once the fixes are verified",
];

/// Trait abstracting script execution for testability.
///
/// The production implementation is
/// [`ProcessExecutor`](crate::process::ProcessExecutor).
#[cfg_attr(test, mockall::automock)]
pub trait ScriptExecutor {
    /// Runs `script` to completion and returns its captured output.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::SpawnFailed`] when the script cannot be
    /// started.
    fn execute(&self, script: &FixScript) -> Result<ScriptOutput, RunnerError>;
}

/// Scripts that ran, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    runs: Vec<ScriptRun>,
}

impl RunSummary {
    /// Completed runs in execution order.
    #[must_use]
    pub fn runs(&self) -> &[ScriptRun] {
        &self.runs
    }

    /// The fixed follow-up checklist.
    #[must_use]
    pub const fn next_steps(&self) -> &'static [&'static str] {
        &NEXT_STEPS
    }
}

/// Runs fix scripts strictly in sequence through an executor.
#[derive(Debug)]
pub struct ScriptRunner<E> {
    executor: E,
}

impl<E> ScriptRunner<E> {
    /// Creates a runner delegating to `executor`.
    #[must_use]
    pub const fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Returns a reference to the executor.
    #[must_use]
    pub const fn executor(&self) -> &E {
        &self.executor
    }
}

impl<E: ScriptExecutor> ScriptRunner<E> {
    /// Runs `scripts` in order.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::ScriptNotFound`] before running anything when a
    /// script is missing, and the first [`RunnerError::SpawnFailed`],
    /// [`RunnerError::NonZeroExit`] or [`RunnerError::StderrOutput`]
    /// otherwise. Scripts after the failing one are not run.
    pub fn run(&self, scripts: &[FixScript]) -> Result<RunSummary, RunnerError> {
        if let Some(missing) = scripts.iter().find(|script| !script.path().is_file()) {
            return Err(RunnerError::ScriptNotFound {
                path: missing.path().to_path_buf(),
            });
        }

        let mut summary = RunSummary::default();
        for script in scripts {
            let name = script.name();
            info!(target: RUNNER_TARGET, script = %name, "running fix script");
            let output = self.executor.execute(script)?;
            if !output.succeeded() {
                return Err(RunnerError::NonZeroExit {
                    script: name,
                    status: output.status,
                    stdout: output.stdout,
                    stderr: output.stderr,
                });
            }
            if !output.stderr.trim().is_empty() {
                warn!(target: RUNNER_TARGET, script = %name, stderr = %output.stderr.trim_end(), "fix script wrote to stderr");
                return Err(RunnerError::StderrOutput {
                    script: name,
                    stdout: output.stdout,
                    stderr: output.stderr,
                });
            }

            summary.runs.push(ScriptRun {
                script: name,
                stdout: output.stdout,
            });
        }
        Ok(summary)
    }
}
