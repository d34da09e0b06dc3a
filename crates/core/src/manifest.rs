//! Package manifest written alongside the package contents
//!
//! The manifest records the package identity, its normalized dependency and
//! conflict ranges, and a SHA256 digest for every payload file.
//!
//! # Format
//!
//! ```json
//! {
//!     "name": "core",
//!     "displayName": "Core Mod",
//!     "version": "1.0",
//!     "description": "The core mod",
//!     "section": "any",
//!     "dependencies": { "forge": "(,)" },
//!     "conflicts": {},
//!     "files": { "mods/core.jar": { "sha256": "..." } }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::Result;
use crate::descriptor::PackageDescriptor;
use crate::error::IoContext;
use crate::version::{Scalar, normalize};

/// Hash record for one payload file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub sha256: String,
}

/// Serialized description of a built package.
///
/// Field order is the serialization order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub name: String,
    pub display_name: String,
    pub version: String,
    pub description: String,
    pub section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub dependencies: IndexMap<String, String>,
    pub conflicts: IndexMap<String, String>,
    /// Sorted by path so the output is reproducible.
    pub files: BTreeMap<String, FileEntry>,
}

impl Manifest {
    /// Build a manifest for `package` with an empty file table.
    pub fn from_descriptor(package: &PackageDescriptor) -> Self {
        Self {
            name: package.name.clone(),
            display_name: package.display_name.clone(),
            version: package.version.clone(),
            description: package.description.clone(),
            section: package.section.clone(),
            url: package.url.clone(),
            dependencies: normalize_all(&package.depends),
            conflicts: normalize_all(&package.conflicts),
            files: BTreeMap::new(),
        }
    }

    /// Replace the file table with `path -> sha256` digests.
    pub fn set_files(&mut self, hashes: BTreeMap<String, String>) {
        self.files = hashes
            .into_iter()
            .map(|(path, sha256)| (path, FileEntry { sha256 }))
            .collect();
    }

    /// Serialize as JSON with four-space indentation.
    pub fn to_json(&self) -> Result<String> {
        let mut out = Vec::new();
        let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut serializer)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Write the manifest to `path`.
    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?).at(path)
    }

    /// Read a manifest back from `path`.
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).at(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

fn normalize_all(specs: &IndexMap<String, Option<Scalar>>) -> IndexMap<String, String> {
    specs
        .iter()
        .map(|(name, raw)| (name.clone(), normalize(raw.as_ref())))
        .collect()
}
