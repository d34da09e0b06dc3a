//! Shared test helpers for CLI integration tests.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Isolated test environment.
///
/// Each test gets its own temporary directory holding the descriptor, its
/// local sources and the build root.
pub struct TestEnv {
    pub temp: TempDir,
    pub descriptor_path: PathBuf,
}

impl TestEnv {
    /// Create an environment with `content` as `pkg/minecraft_pkg.yml`.
    pub fn with_descriptor(content: &str) -> Self {
        let temp = TempDir::new().unwrap();
        let descriptor_path = temp.path().join("pkg").join("minecraft_pkg.yml");
        let env = Self { temp, descriptor_path };
        env.write_file("pkg/minecraft_pkg.yml", content);
        env
    }

    /// Write a file relative to the temp directory.
    pub fn write_file(&self, relative_path: &str, content: &str) {
        let path = self.temp.path().join(relative_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
    }

    /// Build root (isolated per test).
    pub fn build_path(&self) -> PathBuf {
        self.temp.path().join("build")
    }

    /// Get a pre-configured Command for the mkpkg binary.
    ///
    /// Runs inside the temp directory with `MKPKG_BUILDDIR` pointing at the
    /// isolated build root.
    pub fn mkpkg_cmd(&self) -> Command {
        let mut cmd: Command = cargo_bin_cmd!("mkpkg");
        cmd.current_dir(self.temp.path());
        cmd.env("MKPKG_BUILDDIR", self.build_path());
        cmd.env_remove("RUST_LOG");
        cmd
    }
}

/// Read every regular file of a tar archive into `name -> content`.
pub fn archive_files(path: &Path) -> BTreeMap<String, String> {
    let mut archive = tar::Archive::new(File::open(path).unwrap());
    let mut files = BTreeMap::new();

    for entry in archive.entries().unwrap() {
        let mut entry = entry.unwrap();
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let name = entry.path().unwrap().to_string_lossy().into_owned();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        files.insert(name, content);
    }

    files
}
