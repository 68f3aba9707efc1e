//! Backup-first, atomic application of rewrite patches.
//!
//! [`SafeWriter`] is the only component that persists changes to source
//! files. For each file it re-reads the current text, checks that every
//! [`RewritePatch`] still matches the line it was planned against, computes
//! the new text in memory, writes a timestamped backup, and finally replaces
//! the original atomically. A failure at any step leaves the original file as
//! it was.
//!
//! ```ignore
//! use shadowfix_harness::{BackupMode, RewritePatch, SafeWriter};
//! use shadowfix_syntax::SourceFile;
//!
//! let source = SourceFile::read("src/Card.tsx")?;
//! let patch = RewritePatch::insert_after(4, "  card: {", "    backgroundColor: 'white',");
//! let outcome = SafeWriter::new(BackupMode::Standard).apply(&source, &[patch])?;
//! ```

mod apply;
mod backup;
mod edit;
mod error;
mod files;
mod writer;

pub use apply::apply_patches;
pub use backup::{BackupMode, Clock, FixedClock, SystemClock, write_backup};
pub use edit::RewritePatch;
pub use error::HarnessError;
pub use writer::{SafeWriter, WriteOutcome};

#[cfg(test)]
mod tests;
