//! Process-based script execution.
//!
//! [`ProcessExecutor`] runs each script as a child process, optionally
//! through an interpreter such as `node`, and waits for it to exit with both
//! output streams captured.

use std::process::Command;

use tracing::debug;

use crate::error::RunnerError;
use crate::runner::ScriptExecutor;
use crate::script::{FixScript, ScriptOutput};

/// Tracing target for script process operations.
const PROCESS_TARGET: &str = "shadowfix_runner::process";

/// Executes scripts as child processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor {
    interpreter: Option<String>,
}

impl ProcessExecutor {
    /// Runs scripts directly, relying on their executable bit.
    #[must_use]
    pub const fn direct() -> Self {
        Self { interpreter: None }
    }

    /// Runs every script as `<interpreter> <script>`.
    #[must_use]
    pub fn with_interpreter(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: Some(interpreter.into()),
        }
    }

    fn command(&self, script: &FixScript) -> Command {
        match &self.interpreter {
            Some(interpreter) => {
                let mut command = Command::new(interpreter);
                command.arg(script.path());
                command
            }
            None => Command::new(script.path()),
        }
    }
}

impl ScriptExecutor for ProcessExecutor {
    fn execute(&self, script: &FixScript) -> Result<ScriptOutput, RunnerError> {
        let name = script.name();
        debug!(
            target: PROCESS_TARGET,
            script = %name,
            interpreter = self.interpreter.as_deref().unwrap_or("<none>"),
            "spawning fix script"
        );

        let output = self
            .command(script)
            .output()
            .map_err(|error| RunnerError::spawn(&name, error))?;

        debug!(
            target: PROCESS_TARGET,
            script = %name,
            status = ?output.status.code(),
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "fix script exited"
        );

        Ok(ScriptOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
