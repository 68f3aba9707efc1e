//! Command-line interface runtime for the shadowfix toolchain.
//!
//! The module owns argument parsing, configuration bootstrapping and
//! subcommand dispatch. The runtime is exercised both from the binary
//! entrypoint and from tests, where configuration loading and IO streams can
//! be substituted.

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use shadowfix_config::Config;
use shadowfix_harness::BackupMode;
use shadowfix_rules::{ExpectationMode, LineExpectation, PlanOptions, VerifyRequest, verify_path};
use shadowfix_runner::{FixScript, ProcessExecutor, ScriptRunner};

mod cli;
mod config;
mod discovery;
mod errors;
mod output;
mod pipeline;
mod telemetry;

use cli::{Cli, CliCommand};
pub use cli::OutputFormat;
use config::{ConfigArgumentSplit, split_config_arguments};
pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
use discovery::{DiscoveryRules, discover};
pub(crate) use errors::AppError;
use output::Renderer;
use output::models::RunReport;
use pipeline::{FixSettings, fix_files, scan_files};

/// CLI flags recognised by the configuration loader.
///
/// MAINTENANCE: This list must be kept in sync with the fields of
/// `shadowfix_config::Config`.
const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--log-filter",
    "--log-format",
    "--extensions",
    "--exclude-markers",
    "--opaque-color",
    "--script-interpreter",
    "--scripts",
];

/// Bundles the IO streams provided to the CLI runtime.
pub(crate) struct IoStreams<'a, W: Write, E: Write> {
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
}

impl<'a, W: Write, E: Write> IoStreams<'a, W, E> {
    pub(crate) const fn new(stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self { stdout, stderr }
    }
}

struct CliRunner<'a, 'io, W: Write, E: Write, L: ConfigLoader> {
    io: &'a mut IoStreams<'io, W, E>,
    loader: &'a L,
}

impl<'a, 'io, W, E, L> CliRunner<'a, 'io, W, E, L>
where
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    const fn new(io: &'a mut IoStreams<'io, W, E>, loader: &'a L) -> Self {
        Self { io, loader }
    }

    fn run<I>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
    {
        let arguments: Vec<OsString> = args.into_iter().collect();
        let split = split_config_arguments(&arguments);
        let cli_arguments = prepare_cli_arguments(&arguments, &split);

        let cli = match Cli::try_parse_from(cli_arguments) {
            Ok(cli) => cli,
            Err(error) if is_informational(&error) => {
                let _ = write!(self.io.stdout, "{error}");
                return ExitCode::SUCCESS;
            }
            Err(error) => return self.fail(&AppError::CliUsage(error)),
        };

        let result = self
            .loader
            .load(&split.config_arguments)
            .and_then(|config| {
                telemetry::initialise(&config)?;
                self.dispatch(cli, &config)
            });

        match result {
            Ok(exit_code) => exit_code,
            Err(error) => self.fail(&error),
        }
    }

    fn fail(&mut self, error: &AppError) -> ExitCode {
        let _ = writeln!(self.io.stderr, "{error}");
        ExitCode::FAILURE
    }

    fn dispatch(&mut self, cli: Cli, config: &Config) -> Result<ExitCode, AppError> {
        let renderer = Renderer::new(cli.format);
        match cli.command {
            CliCommand::Scan { paths } => {
                let found = discover(&default_targets(paths), &discovery_rules(config));
                let report = scan_files(&found.files, found.missing);
                renderer.scan(&report, &mut *self.io.stdout)?;
                Ok(exit_code(report.is_clean() && report.missing.is_empty()))
            }
            CliCommand::Fix {
                paths,
                final_pass,
                dry_run,
            } => {
                let found = discover(&default_targets(paths), &discovery_rules(config));
                let settings = FixSettings {
                    options: PlanOptions::new(config.opaque_color()),
                    mode: if final_pass {
                        BackupMode::Final
                    } else {
                        BackupMode::Standard
                    },
                    dry_run,
                };
                let report = fix_files(&found.files, found.missing, &settings);
                renderer.fix(&report, &mut *self.io.stdout)?;
                Ok(exit_code(report.succeeded() && report.missing.is_empty()))
            }
            CliCommand::Verify {
                file,
                lines,
                expect,
                reject,
            } => {
                let request = verify_request(lines, expect, reject);
                let report = verify_path(&file, &request)?;
                renderer.verify(&report, &mut *self.io.stdout)?;
                Ok(exit_code(report.is_clean()))
            }
            CliCommand::RunAll { scripts } => {
                self.run_scripts(renderer, cli.format, scripts, config)
            }
        }
    }

    fn run_scripts(
        &mut self,
        renderer: Renderer,
        format: OutputFormat,
        scripts: Vec<PathBuf>,
        config: &Config,
    ) -> Result<ExitCode, AppError> {
        let selected = if scripts.is_empty() {
            config.scripts().to_vec()
        } else {
            scripts
        };
        if selected.is_empty() {
            return Err(AppError::NoScripts);
        }

        let executor = config
            .script_interpreter()
            .map_or_else(ProcessExecutor::direct, ProcessExecutor::with_interpreter);
        let fix_scripts: Vec<FixScript> = selected.into_iter().map(FixScript::new).collect();
        match ScriptRunner::new(executor).run(&fix_scripts) {
            Ok(summary) => {
                renderer.run_all(&RunReport::completed(&summary), &mut *self.io.stdout)?;
                Ok(ExitCode::SUCCESS)
            }
            Err(error) => {
                let report = RunReport::failed(&error);
                match format {
                    OutputFormat::Human => renderer.run_all(&report, &mut *self.io.stderr)?,
                    OutputFormat::Json => renderer.run_all(&report, &mut *self.io.stdout)?,
                }
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdout, stderr);
    run_with_loader(args, &mut io, &OrthoConfigLoader)
}

pub(crate) fn run_with_loader<I, W, E, L>(
    args: I,
    io: &mut IoStreams<'_, W, E>,
    loader: &L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    CliRunner::new(io, loader).run(args)
}

fn prepare_cli_arguments(args: &[OsString], split: &ConfigArgumentSplit) -> Vec<OsString> {
    args.first()
        .into_iter()
        .chain(args.iter().skip(split.command_start))
        .cloned()
        .collect()
}

fn is_informational(error: &clap::Error) -> bool {
    matches!(
        error.kind(),
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
    )
}

fn default_targets(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths
    }
}

fn discovery_rules(config: &Config) -> DiscoveryRules {
    DiscoveryRules::new(config.extensions(), config.exclude_markers())
}

fn verify_request(
    lines: Vec<usize>,
    expect: Vec<(usize, String)>,
    reject: Vec<(usize, String)>,
) -> VerifyRequest {
    let expectations = expect
        .into_iter()
        .map(|(line, text)| LineExpectation::new(line, text, ExpectationMode::Contains))
        .chain(
            reject
                .into_iter()
                .map(|(line, text)| LineExpectation::new(line, text, ExpectationMode::Absent)),
        );
    expectations.fold(VerifyRequest::new().with_lines(lines), VerifyRequest::expect)
}

const fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests;
