//! Sequential runner for external fix scripts.
//!
//! [`ScriptRunner`] checks that every script exists, then runs them one at a
//! time through a [`ScriptExecutor`], awaiting each before starting the next.
//! The first failure halts the run and names the script. The production
//! executor is [`ProcessExecutor`]; tests inject doubles.

mod error;
pub mod process;
pub mod runner;
mod script;

pub use error::RunnerError;
pub use process::ProcessExecutor;
pub use runner::{NEXT_STEPS, RunSummary, ScriptExecutor, ScriptRunner};
pub use script::{FixScript, ScriptOutput, ScriptRun};
