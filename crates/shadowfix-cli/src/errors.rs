//! Error types for the CLI runtime.

use std::io;
use std::sync::Arc;

use shadowfix_syntax::SyntaxError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("failed to initialise logging: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("verification failed: {0}")]
    Verify(#[from] SyntaxError),
    #[error("no fix scripts given and none configured")]
    NoScripts,
    #[error("failed to serialise report: {0}")]
    SerialiseReport(serde_json::Error),
    #[error("failed to write report: {0}")]
    WriteReport(#[from] io::Error),
}
