//! The safe writer: the only component that persists file changes.

use std::path::PathBuf;

use serde::Serialize;
use shadowfix_syntax::SourceFile;
use tracing::{debug, info};

use crate::apply::apply_patches;
use crate::backup::{BackupMode, Clock, SystemClock, write_backup};
use crate::edit::RewritePatch;
use crate::error::HarnessError;
use crate::files::atomic_write;

const WRITER_TARGET: &str = "shadowfix_harness::writer";

/// Result of applying a patch set to one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WriteOutcome {
    /// Nothing to apply; the file and its directory were left untouched.
    Unchanged,
    /// The file was rewritten after its backup was created.
    Written {
        /// Path of the backup holding the pre-write text.
        backup: PathBuf,
        /// Number of patches applied.
        patches_applied: usize,
    },
}

impl WriteOutcome {
    /// Backup path when the file was written.
    #[must_use]
    pub fn backup(&self) -> Option<&std::path::Path> {
        match self {
            Self::Unchanged => None,
            Self::Written { backup, .. } => Some(backup),
        }
    }
}

/// Applies patches with a backup-first, all-or-nothing discipline.
#[derive(Debug, Clone)]
pub struct SafeWriter<C = SystemClock> {
    mode: BackupMode,
    clock: C,
}

impl SafeWriter<SystemClock> {
    /// Creates a writer stamping backups with the wall clock.
    #[must_use]
    pub const fn new(mode: BackupMode) -> Self {
        Self {
            mode,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> SafeWriter<C> {
    /// Creates a writer with an explicit timestamp source.
    #[must_use]
    pub const fn with_clock(mode: BackupMode, clock: C) -> Self {
        Self { mode, clock }
    }

    /// Backup naming scheme in use.
    #[must_use]
    pub const fn mode(&self) -> BackupMode {
        self.mode
    }

    /// Applies `patches`, planned against `source`, to the file on disk.
    ///
    /// The file is re-read first and every patch is checked against the
    /// current text. The backup is written before the original is replaced.
    ///
    /// # Errors
    ///
    /// Returns a structural [`HarnessError`] for stale or conflicting patches
    /// and an I/O variant when reading, backing up or writing fails. The
    /// original file is unmodified in every error case.
    pub fn apply(
        &self,
        source: &SourceFile,
        patches: &[RewritePatch],
    ) -> Result<WriteOutcome, HarnessError> {
        let path = source.path();
        if patches.is_empty() {
            debug!(target: WRITER_TARGET, path = %path.display(), "no patches, leaving file untouched");
            return Ok(WriteOutcome::Unchanged);
        }

        let text = std::fs::read_to_string(path)
            .map_err(|error| HarnessError::file_read(path, error.to_string()))?;
        let current = SourceFile::new(path, text);
        let rewritten = apply_patches(&current, patches)?;

        let backup = self.mode.backup_path(path, self.clock.now_millis());
        write_backup(&backup, current.text())?;
        debug!(
            target: WRITER_TARGET,
            path = %path.display(),
            backup = %backup.display(),
            "backup created"
        );

        atomic_write(path, rewritten.as_bytes())
            .map_err(|error| HarnessError::file_write(path, &error))?;
        info!(
            target: WRITER_TARGET,
            path = %path.display(),
            patches = patches.len(),
            "file rewritten"
        );

        Ok(WriteOutcome::Written {
            backup,
            patches_applied: patches.len(),
        })
    }
}
