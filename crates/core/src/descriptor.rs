//! Package descriptor loading.
//!
//! A descriptor file is a YAML stream; every document in it describes one
//! package. Documents are checked once here and turned into
//! [`PackageDescriptor`] records, so the rest of the build never deals with
//! loosely typed data.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use crate::error::DescriptorError;
use crate::version::Scalar;

/// Conventional file name of a package descriptor.
pub const DESCRIPTOR_FILE: &str = "minecraft_pkg.yml";

/// Section assigned to packages that do not declare one.
pub const DEFAULT_SECTION: &str = "any";

/// A validated package descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageDescriptor {
    pub name: String,
    pub display_name: String,
    pub version: String,
    pub description: String,
    pub section: String,
    pub url: Option<String>,
    /// Dependency name to raw version specifier, in descriptor order.
    pub depends: IndexMap<String, Option<Scalar>>,
    /// Conflicting package name to raw version specifier, in descriptor order.
    pub conflicts: IndexMap<String, Option<Scalar>>,
    /// Target path inside the package directory to source locator.
    pub sources: IndexMap<String, String>,
}

impl PackageDescriptor {
    /// `<name>-<version>`, used for the package directory and archive names.
    pub fn id(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }
}

/// A descriptor document as written, before required fields are checked.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDescriptor {
    name: Option<String>,
    display_name: Option<String>,
    version: Option<Scalar>,
    description: Option<String>,
    section: Option<String>,
    url: Option<String>,
    depends: Option<IndexMap<String, Option<Scalar>>>,
    conflicts: Option<IndexMap<String, Option<Scalar>>>,
    sources: Option<IndexMap<String, String>>,
}

impl RawDescriptor {
    fn validate(self, path: &Path) -> Result<PackageDescriptor, DescriptorError> {
        let missing = |field: &'static str| DescriptorError::MissingField {
            path: path.to_path_buf(),
            field,
        };

        Ok(PackageDescriptor {
            name: self.name.ok_or_else(|| missing("name"))?,
            display_name: self.display_name.ok_or_else(|| missing("displayName"))?,
            version: self.version.ok_or_else(|| missing("version"))?.to_string(),
            description: self.description.ok_or_else(|| missing("description"))?,
            section: self.section.unwrap_or_else(|| DEFAULT_SECTION.to_string()),
            url: self.url,
            depends: self.depends.unwrap_or_default(),
            conflicts: self.conflicts.unwrap_or_default(),
            sources: self.sources.unwrap_or_default(),
        })
    }
}

/// Parse every package document in `content`.
///
/// `path` is only used for error messages.
pub fn parse_descriptors(content: &str, path: &Path) -> Result<Vec<PackageDescriptor>, DescriptorError> {
    let mut packages = Vec::new();

    for (index, document) in serde_yaml::Deserializer::from_str(content).enumerate() {
        let raw: Option<RawDescriptor> =
            Option::deserialize(document).map_err(|source| DescriptorError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let raw = raw.ok_or_else(|| DescriptorError::EmptyDocument {
            path: path.to_path_buf(),
            index,
        })?;

        packages.push(raw.validate(path)?);
    }

    Ok(packages)
}

/// Load all packages described in the file at `path`.
pub fn load_descriptors(path: &Path) -> Result<Vec<PackageDescriptor>, DescriptorError> {
    let content = fs::read_to_string(path).map_err(|source| DescriptorError::Read {
        path: PathBuf::from(path),
        source,
    })?;

    let packages = parse_descriptors(&content, path)?;
    debug!(path = %path.display(), count = packages.len(), "loaded descriptor");
    Ok(packages)
}
