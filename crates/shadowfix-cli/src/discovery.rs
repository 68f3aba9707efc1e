//! Source file discovery.
//!
//! Directories are walked recursively in file-name order. Directories whose
//! name contains an exclusion marker are pruned, files are selected by
//! extension, and backups written by the safe writer are never returned.
//! Explicitly named files are taken as given, whatever their extension.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

const DISCOVERY_TARGET: &str = "shadowfix::discovery";
const BACKUP_MARKER: &str = ".backup_";

/// Which files to pick up while walking.
#[derive(Debug, Clone)]
pub(crate) struct DiscoveryRules {
    extensions: Vec<String>,
    exclude_markers: Vec<String>,
}

impl DiscoveryRules {
    pub(crate) const fn new(extensions: Vec<String>, exclude_markers: Vec<String>) -> Self {
        Self {
            extensions,
            exclude_markers,
        }
    }

    fn is_excluded_dir(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        self.exclude_markers
            .iter()
            .any(|marker| name.contains(marker.as_str()))
    }

    fn selects(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy())
            .is_some_and(|ext| self.extensions.iter().any(|wanted| *wanted == ext))
    }
}

/// Files to process plus explicitly named paths that do not exist.
#[derive(Debug, Default)]
pub(crate) struct Discovery {
    pub(crate) files: Vec<PathBuf>,
    pub(crate) missing: Vec<PathBuf>,
}

/// Expands `targets` into the files to process.
pub(crate) fn discover(targets: &[PathBuf], rules: &DiscoveryRules) -> Discovery {
    let mut discovery = Discovery::default();
    for target in targets {
        if target.is_dir() {
            walk(target, rules, &mut discovery.files);
        } else if target.is_file() {
            if !is_backup(target) {
                discovery.files.push(target.clone());
            }
        } else {
            warn!(
                target: DISCOVERY_TARGET,
                path = %target.display(),
                "path does not exist; skipping"
            );
            discovery.missing.push(target.clone());
        }
    }
    let mut seen = BTreeSet::new();
    discovery.files.retain(|file| seen.insert(file.clone()));
    debug!(
        target: DISCOVERY_TARGET,
        files = discovery.files.len(),
        missing = discovery.missing.len(),
        "discovery complete"
    );
    discovery
}

fn walk(root: &Path, rules: &DiscoveryRules, files: &mut Vec<PathBuf>) {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !rules.is_excluded_dir(entry));
    for item in walker {
        match item {
            Ok(entry) => {
                let path = entry.path();
                if entry.file_type().is_file() && rules.selects(path) && !is_backup(path) {
                    files.push(entry.into_path());
                }
            }
            Err(error) => warn!(
                target: DISCOVERY_TARGET,
                error = %error,
                "skipping unreadable entry"
            ),
        }
    }
}

fn is_backup(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().contains(BACKUP_MARKER))
}
