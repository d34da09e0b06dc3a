//! Per-package build context.
//!
//! Holds the resolved directories for one package and the variable bindings
//! used to expand its target paths and source locators. A context is built
//! once per descriptor and passed by reference into the fetch and build steps.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::Settings;
use crate::descriptor::PackageDescriptor;
use crate::error::IoContext;
use crate::Result;
use crate::vars::VariableSet;

#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Directory containing the descriptor file; relative sources resolve here.
    pub work_dir: PathBuf,
    /// Root that receives package directories and archives.
    pub build_dir: PathBuf,
    /// `<build_dir>/<name>-<version>`
    pub pkg_dir: PathBuf,
    pub manifest_name: String,
    pub variables: VariableSet,
    pub user_agent: String,
    pub timeout: Duration,
}

impl BuildContext {
    /// Create the context for `package`, loaded from `descriptor_path`.
    ///
    /// Both directories are made absolute. The build root must already exist.
    pub fn new(settings: &Settings, descriptor_path: &Path, package: &PackageDescriptor) -> Result<Self> {
        let descriptor_dir = match descriptor_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let work_dir = dunce::canonicalize(descriptor_dir).at(descriptor_dir)?;
        let build_dir = dunce::canonicalize(&settings.build_dir).at(&settings.build_dir)?;
        let pkg_dir = build_dir.join(package.id());

        let mut variables = settings.variables.clone();
        variables.insert("builddir", build_dir.to_string_lossy());
        variables.insert("workdir", work_dir.to_string_lossy());
        variables.insert("pkgdir", pkg_dir.to_string_lossy());
        variables.insert("name", package.name.as_str());
        variables.insert("displayName", package.display_name.as_str());
        variables.insert("version", package.version.as_str());

        Ok(Self {
            work_dir,
            build_dir,
            pkg_dir,
            manifest_name: settings.manifest_name.clone(),
            variables,
            user_agent: settings.user_agent.clone(),
            timeout: settings.timeout,
        })
    }

    /// Path of the manifest inside the package directory.
    pub fn manifest_path(&self) -> PathBuf {
        self.pkg_dir.join(&self.manifest_name)
    }

    /// Path of the archive for `package` inside the build root.
    pub fn archive_path(&self, package: &PackageDescriptor) -> PathBuf {
        self.build_dir.join(format!("{}.tar", package.id()))
    }
}
