//! Run-wide settings shared by every package build.

use std::path::PathBuf;
use std::time::Duration;

use crate::vars::VariableSet;

/// Reserved file name of the manifest inside a package directory.
pub const MANIFEST_FILE: &str = "mods.json";

/// Default build root, relative to the current directory.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Default HTTP timeout for a single download.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Settings for one invocation, independent of any particular descriptor.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory that receives package directories and archives.
    pub build_dir: PathBuf,
    /// User supplied variable bindings.
    pub variables: VariableSet,
    /// Manifest file name inside each package directory.
    pub manifest_name: String,
    /// `User-Agent` header sent with every download.
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            build_dir: PathBuf::from(DEFAULT_BUILD_DIR),
            variables: VariableSet::new(),
            manifest_name: MANIFEST_FILE.to_string(),
            user_agent: concat!("mkpkg/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Settings {
    pub fn with_build_dir(mut self, build_dir: impl Into<PathBuf>) -> Self {
        self.build_dir = build_dir.into();
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name, value);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
