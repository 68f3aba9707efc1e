//! Atomic replacement of file contents.

use std::io::{self, Write};
use std::path::Path;

use tempfile::Builder;

/// Replaces the contents of `path` with `contents`.
///
/// The bytes go to a temporary file in the same directory, which is synced
/// and then renamed over the target, so readers see either the old or the
/// new contents. The target's permissions are carried over.
pub(crate) fn atomic_write(path: &Path, contents: &[u8]) -> io::Result<()> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        Some(_) => Path::new("."),
        None => {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                "target path did not have a parent directory",
            ));
        }
    };
    let permissions = std::fs::metadata(path)?.permissions();

    let mut builder = Builder::new();
    builder.prefix(
        path.file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("shadowfix"),
    );

    let mut file = builder.tempfile_in(directory)?;
    file.write_all(contents)?;
    file.as_file().set_permissions(permissions)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|error| error.error)?;
    Ok(())
}
