//! CLI argument definitions for the shadowfix toolchain.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Report rendering selection.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listings.
    #[default]
    Human,
    /// Pretty-printed JSON reports.
    Json,
}

/// Scans and repairs shadow styles whose background cannot be proven opaque.
#[derive(Parser, Debug)]
#[command(name = "shadowfix", version, disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// Controls how reports are rendered.
    #[arg(long, value_enum, default_value_t = OutputFormat::Human, global = true)]
    pub(crate) format: OutputFormat,
    /// The operation to perform.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum CliCommand {
    /// Lists shadow violations without changing anything.
    Scan {
        /// Files or directories; defaults to the current directory.
        #[arg(value_name = "PATH")]
        paths: Vec<PathBuf>,
    },
    /// Plans, applies and verifies fixes, backing up every changed file.
    Fix {
        /// Files or directories; defaults to the current directory.
        #[arg(value_name = "PATH")]
        paths: Vec<PathBuf>,
        /// Names backups `.backup_final_<millis>` for a final cleanup pass.
        #[arg(long = "final")]
        final_pass: bool,
        /// Prints the planned patches without writing.
        #[arg(long)]
        dry_run: bool,
    },
    /// Re-scans one file and checks line expectations.
    Verify {
        /// File to verify.
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Only report violations touching this one-based line.
        #[arg(long = "line", value_name = "N")]
        lines: Vec<usize>,
        /// Requires TEXT on LINE.
        #[arg(long = "expect", value_name = "LINE:TEXT", value_parser = parse_line_text)]
        expect: Vec<(usize, String)>,
        /// Forbids TEXT on LINE.
        #[arg(long = "reject", value_name = "LINE:TEXT", value_parser = parse_line_text)]
        reject: Vec<(usize, String)>,
    },
    /// Runs fix scripts in order, stopping at the first failure.
    RunAll {
        /// Scripts to run; defaults to the configured list.
        #[arg(value_name = "SCRIPT")]
        scripts: Vec<PathBuf>,
    },
}

/// Parses `LINE:TEXT`, where LINE is one-based.
pub(crate) fn parse_line_text(value: &str) -> Result<(usize, String), String> {
    let (line, text) = value
        .split_once(':')
        .ok_or_else(|| format!("expected LINE:TEXT, got '{value}'"))?;
    let number: usize = line
        .trim()
        .parse()
        .map_err(|_| format!("invalid line number '{line}'"))?;
    if number == 0 {
        return Err(String::from("line numbers start at 1"));
    }
    if text.is_empty() {
        return Err(String::from("expectation text must not be empty"));
    }
    Ok((number, text.to_owned()))
}
