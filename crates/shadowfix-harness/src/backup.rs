//! Timestamped backups.
//!
//! A backup is a verbatim copy of the text that was on disk immediately
//! before a rewrite. Backups are created with create-new semantics and are
//! never overwritten or removed by this crate.

use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use time::OffsetDateTime;

use crate::error::HarnessError;

/// Source of the millisecond timestamp embedded in backup names.
pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
        u64::try_from(nanos.div_euclid(1_000_000)).unwrap_or(0)
    }
}

/// A clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_millis(&self) -> u64 {
        self.0
    }
}

/// Naming scheme for backups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupMode {
    /// `<path>.backup_<millis>`
    #[default]
    Standard,
    /// `<path>.backup_final_<millis>`, used by the final cleanup pass.
    Final,
}

impl BackupMode {
    /// Suffix appended to the original file name.
    #[must_use]
    pub fn suffix(self, millis: u64) -> String {
        match self {
            Self::Standard => format!(".backup_{millis}"),
            Self::Final => format!(".backup_final_{millis}"),
        }
    }

    /// Backup path for `original` at `millis`.
    #[must_use]
    pub fn backup_path(self, original: &Path, millis: u64) -> PathBuf {
        let mut name = OsString::from(original.as_os_str());
        name.push(self.suffix(millis));
        PathBuf::from(name)
    }
}

/// Writes `contents` to a new file at `path`, flushing it to disk.
///
/// # Errors
///
/// Returns [`HarnessError::BackupError`] when the file already exists or
/// cannot be written.
pub fn write_backup(path: &Path, contents: &str) -> Result<(), HarnessError> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|error| HarnessError::backup(path.to_path_buf(), &error))?;
    file.write_all(contents.as_bytes())
        .and_then(|()| file.sync_all())
        .map_err(|error| HarnessError::backup(path.to_path_buf(), &error))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(BackupMode::Standard, "src/Card.tsx.backup_1700000000000")]
    #[case(BackupMode::Final, "src/Card.tsx.backup_final_1700000000000")]
    fn names_backups_after_the_original(#[case] mode: BackupMode, #[case] expected: &str) {
        let path = mode.backup_path(Path::new("src/Card.tsx"), 1_700_000_000_000);
        assert_eq!(path, PathBuf::from(expected));
    }

    #[test]
    fn never_overwrites_an_existing_backup() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("a.tsx.backup_1");
        write_backup(&path, "first").expect("first backup");

        let error = write_backup(&path, "second").expect_err("exists");
        assert!(matches!(error, HarnessError::BackupError { .. }));
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "first");
    }

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now_millis() > 1_577_836_800_000);
    }
}
