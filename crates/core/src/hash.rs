//! Hash computation for package manifests

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Component, Path};

use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::error::IoContext;
use crate::{Error, Result};

/// Compute SHA256 hash of file contents and return as hex string
pub fn compute_hash(path: &Path) -> Result<String> {
    let file = File::open(path).at(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();

    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = reader.read(&mut buffer).at(path)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Compute SHA256 hash of bytes and return as hex string
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Render a path relative to the package root with `/` separators.
fn relative_key(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Hash every payload file below `root`.
///
/// Entries whose name starts with `.` are skipped (hidden directories are not
/// descended into), as is the file at `root/<manifest_name>`. Keys are paths
/// relative to `root`, joined with `/`.
pub fn hash_tree(root: &Path, manifest_name: &str) -> Result<BTreeMap<String, String>> {
    let mut hashes = BTreeMap::new();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

    for entry in walker {
        let entry = entry.map_err(|source| Error::Walk {
            path: root.to_path_buf(),
            source,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let rel_path = relative_key(entry.path().strip_prefix(root).unwrap_or(entry.path()));
        if rel_path == manifest_name {
            continue;
        }

        let digest = compute_hash(entry.path())?;
        hashes.insert(rel_path, digest);
    }

    Ok(hashes)
}
