//! Behavioural tests for the safe writer.

use std::fs;
use std::path::{Path, PathBuf};

use rstest::{fixture, rstest};
use shadowfix_syntax::SourceFile;
use tempfile::TempDir;

use crate::{BackupMode, FixedClock, HarnessError, RewritePatch, SafeWriter, WriteOutcome};

const CARD: &str = concat!(
    "const styles = StyleSheet.create({\n",
    "  card: {\n",
    "    shadowColor: '#000',\n",
    "  },\n",
    "});\n",
);

struct Workspace {
    dir: TempDir,
    file: PathBuf,
}

impl Workspace {
    fn source(&self) -> SourceFile {
        SourceFile::read(&self.file).expect("read source")
    }

    fn entries(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.dir.path())
            .expect("list")
            .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

#[fixture]
fn workspace() -> Workspace {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("Card.tsx");
    fs::write(&file, CARD).expect("seed");
    Workspace { dir, file }
}

fn background_patch() -> RewritePatch {
    RewritePatch::insert_after(1, "  card: {", "    backgroundColor: 'white',")
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read")
}

#[rstest]
fn backup_holds_pre_write_content(workspace: Workspace) {
    let writer = SafeWriter::with_clock(BackupMode::Standard, FixedClock(42));

    let outcome = writer
        .apply(&workspace.source(), &[background_patch()])
        .expect("apply");

    let backup = workspace.dir.path().join("Card.tsx.backup_42");
    assert_eq!(
        outcome,
        WriteOutcome::Written {
            backup: backup.clone(),
            patches_applied: 1,
        }
    );
    assert_eq!(read(&backup), CARD);
    assert!(read(&workspace.file).contains("    backgroundColor: 'white',\n    shadowColor"));
}

#[rstest]
fn final_mode_uses_final_suffix(workspace: Workspace) {
    let writer = SafeWriter::with_clock(BackupMode::Final, FixedClock(7));
    writer
        .apply(&workspace.source(), &[background_patch()])
        .expect("apply");

    assert_eq!(
        workspace.entries(),
        vec!["Card.tsx", "Card.tsx.backup_final_7"]
    );
}

#[rstest]
fn empty_patch_list_writes_nothing(workspace: Workspace) {
    let writer = SafeWriter::with_clock(BackupMode::Standard, FixedClock(1));

    let outcome = writer.apply(&workspace.source(), &[]).expect("apply");

    assert_eq!(outcome, WriteOutcome::Unchanged);
    assert_eq!(workspace.entries(), vec!["Card.tsx"]);
    assert_eq!(read(&workspace.file), CARD);
}

#[rstest]
fn stale_patch_leaves_file_and_directory_untouched(workspace: Workspace) {
    let snapshot = workspace.source();
    let edited = CARD.replace("  card: {", "  cardRenamed: {");
    fs::write(&workspace.file, &edited).expect("concurrent edit");

    let writer = SafeWriter::with_clock(BackupMode::Standard, FixedClock(1));
    let error = writer
        .apply(&snapshot, &[background_patch()])
        .expect_err("stale");

    assert!(error.is_structural());
    assert!(matches!(error, HarnessError::StalePatch { line: 2, .. }));
    assert_eq!(read(&workspace.file), edited);
    assert_eq!(workspace.entries(), vec!["Card.tsx"]);
}

#[rstest]
fn existing_backup_aborts_before_writing(workspace: Workspace) {
    fs::write(workspace.dir.path().join("Card.tsx.backup_9"), "older").expect("seed backup");
    let writer = SafeWriter::with_clock(BackupMode::Standard, FixedClock(9));

    let error = writer
        .apply(&workspace.source(), &[background_patch()])
        .expect_err("backup exists");

    assert!(matches!(error, HarnessError::BackupError { .. }));
    assert_eq!(read(&workspace.file), CARD);
}
