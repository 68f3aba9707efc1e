//! Per-file scan and fix pipelines.
//!
//! Each file is read, indexed and checked on its own. A file that cannot be
//! read, indexed or written is recorded and the batch moves on to the next
//! file; no failure in one file stops another.

use std::path::{Path, PathBuf};

use shadowfix_harness::{BackupMode, SafeWriter};
use shadowfix_rules::{PatchedBlocks, PlanOptions, VerifyRequest, detect, plan, verify, verify_path};
use shadowfix_syntax::{SourceFile, index_blocks};
use tracing::{debug, info, warn};

use crate::output::models::{
    FileError, FileFix, FileScan, FixReport, ScanReport, ViolationRecord,
};

const PIPELINE_TARGET: &str = "shadowfix::pipeline";

/// Scans `files`, reporting only files with violations.
pub(crate) fn scan_files(files: &[PathBuf], missing: Vec<PathBuf>) -> ScanReport {
    let mut report = ScanReport {
        files_scanned: files.len(),
        missing,
        ..ScanReport::default()
    };
    for path in files {
        match scan_file(path) {
            Ok(scan) if scan.violations.is_empty() => {}
            Ok(scan) => report.files.push(scan),
            Err(error) => report.errors.push(error),
        }
    }
    info!(
        target: PIPELINE_TARGET,
        files = report.files_scanned,
        violations = report.total_violations(),
        errors = report.errors.len(),
        "scan complete"
    );
    report
}

fn scan_file(path: &Path) -> Result<FileScan, FileError> {
    let source = SourceFile::read(path).map_err(|error| file_error(path, &error))?;
    let index = index_blocks(&source).map_err(|error| file_error(path, &error))?;
    let violations = detect(&source, &index);
    debug!(
        target: PIPELINE_TARGET,
        path = %path.display(),
        blocks = index.blocks().len(),
        violations = violations.len(),
        "scanned file"
    );
    Ok(FileScan {
        path: path.to_path_buf(),
        violations: violations.iter().map(ViolationRecord::from).collect(),
    })
}

/// How `fix` should treat each file.
#[derive(Debug, Clone)]
pub(crate) struct FixSettings {
    pub(crate) options: PlanOptions,
    pub(crate) mode: BackupMode,
    pub(crate) dry_run: bool,
}

/// Plans, applies and verifies fixes for `files`.
pub(crate) fn fix_files(
    files: &[PathBuf],
    missing: Vec<PathBuf>,
    settings: &FixSettings,
) -> FixReport {
    let writer = SafeWriter::new(settings.mode);
    let mut report = FixReport {
        dry_run: settings.dry_run,
        files_scanned: files.len(),
        missing,
        ..FixReport::default()
    };
    for path in files {
        match fix_file(path, &writer, settings) {
            Ok(Some(fixed)) => report.files.push(fixed),
            Ok(None) => {}
            Err(error) => {
                warn!(
                    target: PIPELINE_TARGET,
                    path = %error.path.display(),
                    error = %error.message,
                    "file skipped"
                );
                report.errors.push(error);
            }
        }
    }
    info!(
        target: PIPELINE_TARGET,
        files = report.files_scanned,
        written = report.files_written(),
        residual = report.residual_violations(),
        errors = report.errors.len(),
        dry_run = settings.dry_run,
        "fix complete"
    );
    report
}

fn fix_file(
    path: &Path,
    writer: &SafeWriter,
    settings: &FixSettings,
) -> Result<Option<FileFix>, FileError> {
    let source = SourceFile::read(path).map_err(|error| file_error(path, &error))?;
    let index = index_blocks(&source).map_err(|error| file_error(path, &error))?;
    let violations = detect(&source, &index);
    if violations.is_empty() {
        return Ok(None);
    }

    let planned = plan(
        &source,
        &index,
        &violations,
        &PatchedBlocks::new(),
        &settings.options,
    );
    let mut fixed = FileFix {
        path: path.to_path_buf(),
        violations: violations.iter().map(ViolationRecord::from).collect(),
        patches: planned.patches().to_vec(),
        notes: planned.notes().to_vec(),
        outcome: None,
        verification: None,
    };
    if settings.dry_run {
        return Ok(Some(fixed));
    }

    let outcome = writer
        .apply(&source, planned.patches())
        .map_err(|error| file_error(path, &error))?;
    let request = VerifyRequest::new();
    let verification = if outcome.backup().is_some() {
        verify_path(path, &request)
    } else {
        verify(&source, &request)
    }
    .map_err(|error| file_error(path, &error))?;

    fixed.outcome = Some(outcome);
    fixed.verification = Some(verification);
    Ok(Some(fixed))
}

fn file_error(path: &Path, error: &dyn std::error::Error) -> FileError {
    FileError {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rstest::{fixture, rstest};
    use shadowfix_harness::WriteOutcome;
    use tempfile::TempDir;

    use super::*;

    const CARD: &str = concat!(
        "const styles = StyleSheet.create({\n",
        "  card: {\n",
        "    shadowColor: '#000',\n",
        "    shadowOpacity: 0.2,\n",
        "  },\n",
        "});\n",
    );

    const PLAIN: &str = concat!(
        "const styles = StyleSheet.create({\n",
        "  title: {\n",
        "    fontSize: 18,\n",
        "  },\n",
        "});\n",
    );

    #[fixture]
    fn workspace() -> TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("Card.tsx"), CARD).expect("write card");
        fs::write(dir.path().join("Title.tsx"), PLAIN).expect("write title");
        fs::write(dir.path().join("Broken.tsx"), "card: {\n  shadowRadius: 2,\n").expect("write");
        dir
    }

    fn settings(dry_run: bool) -> FixSettings {
        FixSettings {
            options: PlanOptions::default(),
            mode: BackupMode::Standard,
            dry_run,
        }
    }

    fn backups(dir: &Path) -> Vec<PathBuf> {
        fs::read_dir(dir)
            .expect("read dir")
            .map(|entry| entry.expect("entry").path())
            .filter(|path| path.to_string_lossy().contains(".backup_"))
            .collect()
    }

    #[rstest]
    fn scan_reports_violations_and_continues_past_errors(workspace: TempDir) {
        let files = ["Broken.tsx", "Card.tsx", "Title.tsx"].map(|name| workspace.path().join(name));
        let report = scan_files(&files, Vec::new());
        assert_eq!(report.files_scanned, 3);
        assert_eq!(report.total_violations(), 1);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors.iter().all(|error| error.path.ends_with("Broken.tsx")));
        let card = report.files.first().expect("card report");
        assert_eq!(card.violations.first().map(|v| v.line), Some(2));
    }

    #[rstest]
    fn fix_writes_backup_and_verifies_clean(workspace: TempDir) {
        let card = workspace.path().join("Card.tsx");
        let report = fix_files(&[card.clone()], Vec::new(), &settings(false));

        assert!(report.succeeded());
        assert_eq!(report.files_written(), 1);
        let fixed = fs::read_to_string(&card).expect("read fixed");
        assert!(fixed.contains("    backgroundColor: 'white',\n"));
        let saved = backups(workspace.path());
        assert_eq!(saved.len(), 1);
        let backup = saved.first().expect("backup");
        assert_eq!(fs::read_to_string(backup).expect("read backup"), CARD);
    }

    #[rstest]
    fn second_fix_pass_writes_nothing(workspace: TempDir) {
        let card = workspace.path().join("Card.tsx");
        fix_files(&[card.clone()], Vec::new(), &settings(false));
        let again = fix_files(&[card], Vec::new(), &settings(false));
        assert!(again.files.is_empty());
        assert_eq!(backups(workspace.path()).len(), 1);
    }

    #[rstest]
    fn clean_files_get_no_backup(workspace: TempDir) {
        let title = workspace.path().join("Title.tsx");
        let report = fix_files(&[title.clone()], Vec::new(), &settings(false));
        assert!(report.files.is_empty());
        assert!(backups(workspace.path()).is_empty());
        assert_eq!(fs::read_to_string(title).expect("read"), PLAIN);
    }

    #[rstest]
    fn dry_run_plans_without_writing(workspace: TempDir) {
        let card = workspace.path().join("Card.tsx");
        let report = fix_files(&[card.clone()], Vec::new(), &settings(true));
        let planned = report.files.first().expect("planned file");
        assert_eq!(planned.patches.len(), 1);
        assert_eq!(planned.outcome, None::<WriteOutcome>);
        assert_eq!(fs::read_to_string(card).expect("read"), CARD);
        assert!(backups(workspace.path()).is_empty());
    }
}
