//! Tar archive creation for built packages

use std::fs::{self, File};
use std::path::Path;

use tracing::info;

use crate::Result;
use crate::error::IoContext;

/// Bundle every top-level entry of `pkg_dir` into an uncompressed tar at `dest`.
///
/// Entries are stored under their own names, in sorted order, with
/// directories added recursively.
pub fn create_archive(pkg_dir: &Path, dest: &Path) -> Result<()> {
    let mut entries = fs::read_dir(pkg_dir)
        .at(pkg_dir)?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<std::io::Result<Vec<_>>>()
        .at(pkg_dir)?;
    entries.sort();

    let file = File::create(dest).at(dest)?;
    let mut builder = tar::Builder::new(file);

    for name in &entries {
        let path = pkg_dir.join(name);
        if path.is_dir() {
            builder.append_dir_all(name, &path).at(&path)?;
        } else {
            builder.append_path_with_name(&path, name).at(&path)?;
        }
    }

    builder.into_inner().at(dest)?;
    info!(path = %dest.display(), entries = entries.len(), "archive written");
    Ok(())
}
