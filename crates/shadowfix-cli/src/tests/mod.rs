//! In-process tests for the CLI runtime with a static configuration.

use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use rstest::{fixture, rstest};
use shadowfix_config::Config;
use tempfile::TempDir;

use super::*;

const CARD: &str = concat!(
    "import { StyleSheet } from 'react-native';\n",
    "\n",
    "const styles = StyleSheet.create({\n",
    "  card: {\n",
    "    padding: 16,\n",
    "    shadowColor: '#000',\n",
    "    shadowOffset: { width: 0, height: 2 },\n",
    "    shadowOpacity: 0.25,\n",
    "  },\n",
    "});\n",
);

struct StaticConfigLoader {
    config: Config,
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

struct Outcome {
    exit: ExitCode,
    stdout: String,
    stderr: String,
}

fn run_cli(args: &[&str], config: Config) -> Outcome {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let loader = StaticConfigLoader { config };
    let exit = {
        let mut io = IoStreams::new(&mut stdout, &mut stderr);
        run_with_loader(
            args.iter().map(OsString::from),
            &mut io,
            &loader,
        )
    };
    Outcome {
        exit,
        stdout: String::from_utf8(stdout).expect("utf8 stdout"),
        stderr: String::from_utf8(stderr).expect("utf8 stderr"),
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[fixture]
fn project() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("src")).expect("mkdir");
    fs::write(dir.path().join("src/Card.tsx"), CARD).expect("write card");
    dir
}

#[rstest]
fn scan_fails_when_violations_exist(project: TempDir) {
    let root = path_arg(project.path());
    let outcome = run_cli(&["shadowfix", "scan", &root], Config::default());
    assert_eq!(outcome.exit, ExitCode::FAILURE);
    assert!(outcome.stdout.contains("missing_background"));
    assert!(outcome.stdout.contains("1 violation in 1 file"));
}

#[rstest]
fn fix_uses_configured_opaque_colour(project: TempDir) {
    let root = path_arg(project.path());
    let config = Config {
        opaque_color: Some(String::from("#fafafa")),
        ..Config::default()
    };
    let outcome = run_cli(&["shadowfix", "fix", &root], config);
    assert_eq!(outcome.exit, ExitCode::SUCCESS, "stderr: {}", outcome.stderr);

    let fixed = fs::read_to_string(project.path().join("src/Card.tsx")).expect("read");
    assert!(fixed.contains("  card: {\n    backgroundColor: '#fafafa',\n    padding: 16,"));

    let rescan = run_cli(&["shadowfix", "scan", &root], Config::default());
    assert_eq!(rescan.exit, ExitCode::SUCCESS);
}

#[rstest]
fn dry_run_leaves_file_untouched(project: TempDir) {
    let root = path_arg(project.path());
    let outcome = run_cli(&["shadowfix", "fix", "--dry-run", &root], Config::default());
    assert_eq!(outcome.exit, ExitCode::SUCCESS);
    assert!(outcome.stdout.contains("dry run: 1 patch planned"));
    let text = fs::read_to_string(project.path().join("src/Card.tsx")).expect("read");
    assert_eq!(text, CARD);
}

#[rstest]
fn json_scan_is_machine_readable(project: TempDir) {
    let root = path_arg(project.path());
    let outcome = run_cli(&["shadowfix", "scan", "--format", "json", &root], Config::default());
    let value: serde_json::Value = serde_json::from_str(&outcome.stdout).expect("json");
    assert_eq!(value["files"][0]["violations"][0]["line"], serde_json::json!(4));
    assert_eq!(value["files"][0]["violations"][0]["block"], serde_json::json!("card"));
}

#[rstest]
fn verify_checks_expectations(project: TempDir) {
    let file = path_arg(&project.path().join("src/Card.tsx"));
    let outcome = run_cli(
        &["shadowfix", "verify", &file, "--expect", "4:card", "--reject", "5:shadow"],
        Config::default(),
    );
    assert_eq!(outcome.exit, ExitCode::FAILURE);
    assert!(outcome.stdout.contains(": failed"));
    assert!(outcome.stdout.contains("missing_background"));
}

#[test]
fn verify_reports_missing_file() {
    let outcome = run_cli(
        &["shadowfix", "verify", "/definitely/not/here.tsx"],
        Config::default(),
    );
    assert_eq!(outcome.exit, ExitCode::FAILURE);
    assert!(outcome.stderr.contains("verification failed"));
}

#[test]
fn run_all_without_scripts_is_an_error() {
    let outcome = run_cli(&["shadowfix", "run-all"], Config::default());
    assert_eq!(outcome.exit, ExitCode::FAILURE);
    assert!(outcome.stderr.contains("no fix scripts given"));
}

#[test]
fn help_goes_to_stdout() {
    let outcome = run_cli(&["shadowfix", "--help"], Config::default());
    assert_eq!(outcome.exit, ExitCode::SUCCESS);
    assert!(outcome.stdout.contains("Usage"));
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    let outcome = run_cli(&["shadowfix", "polish"], Config::default());
    assert_eq!(outcome.exit, ExitCode::FAILURE);
    assert!(outcome.stderr.contains("polish"));
}

#[test]
fn prepare_cli_arguments_drops_config_flags() {
    let args: Vec<OsString> = ["shadowfix", "--opaque-color", "#000", "scan", "src"]
        .iter()
        .map(OsString::from)
        .collect();
    let split = split_config_arguments(&args);
    assert_eq!(
        prepare_cli_arguments(&args, &split),
        vec![
            OsString::from("shadowfix"),
            OsString::from("scan"),
            OsString::from("src")
        ]
    );
}
