//! Report rendering.
//!
//! Every subcommand builds a serialisable report model and hands it to
//! `Renderer`, which writes either a human listing or pretty JSON to
//! standard output.

mod human;
mod json;
pub(crate) mod models;

use std::io::Write;

use shadowfix_rules::VerificationReport;

use crate::AppError;
use crate::cli::OutputFormat;
use models::{FixReport, RunReport, ScanReport};

/// Writes reports in the selected format.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Renderer {
    format: OutputFormat,
}

impl Renderer {
    pub(crate) const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub(crate) fn scan<W: Write>(self, report: &ScanReport, out: &mut W) -> Result<(), AppError> {
        match self.format {
            OutputFormat::Human => human::scan(report, out)?,
            OutputFormat::Json => json::write(report, out)?,
        }
        Ok(())
    }

    pub(crate) fn fix<W: Write>(self, report: &FixReport, out: &mut W) -> Result<(), AppError> {
        match self.format {
            OutputFormat::Human => human::fix(report, out)?,
            OutputFormat::Json => json::write(report, out)?,
        }
        Ok(())
    }

    pub(crate) fn verify<W: Write>(
        self,
        report: &VerificationReport,
        out: &mut W,
    ) -> Result<(), AppError> {
        match self.format {
            OutputFormat::Human => human::verify(report, out)?,
            OutputFormat::Json => json::write(report, out)?,
        }
        Ok(())
    }

    pub(crate) fn run_all<W: Write>(self, report: &RunReport, out: &mut W) -> Result<(), AppError> {
        match self.format {
            OutputFormat::Human => human::run_all(report, out)?,
            OutputFormat::Json => json::write(report, out)?,
        }
        Ok(())
    }
}
