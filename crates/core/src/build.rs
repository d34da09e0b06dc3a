//! Package build orchestration.
//!
//! For each package: resolve its sources, skip the whole build when every
//! target is already present, otherwise fetch what is missing, hash the
//! package directory, write the manifest and bundle the archive.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::archive::create_archive;
use crate::config::Settings;
use crate::context::BuildContext;
use crate::descriptor::{PackageDescriptor, load_descriptors};
use crate::error::IoContext;
use crate::fetch::SourceFetcher;
use crate::hash::hash_tree;
use crate::manifest::Manifest;
use crate::progress::{Outcome, Progress, Step};
use crate::Result;

/// Produces the manifest for one package.
///
/// Descriptors are validated when loaded, so every required field is
/// already present by the time a builder exists.
#[derive(Debug)]
pub struct ManifestBuilder<'a> {
    ctx: &'a BuildContext,
    manifest: Manifest,
    fetcher: SourceFetcher,
}

impl<'a> ManifestBuilder<'a> {
    pub fn new(package: &PackageDescriptor, ctx: &'a BuildContext) -> Result<Self> {
        Ok(Self {
            ctx,
            manifest: Manifest::from_descriptor(package),
            fetcher: SourceFetcher::new(ctx, &package.sources)?,
        })
    }

    /// True when every declared source already exists in the package directory.
    pub fn would_skip(&self) -> bool {
        self.fetcher.would_skip()
    }

    /// Fetch missing sources, hash the package directory and write the manifest.
    pub fn build(mut self, progress: &dyn Progress) -> Result<Manifest> {
        if !self.fetcher.would_skip() {
            self.fetcher.fetch_all(progress)?;
        }

        let id = format!("{}-{}", self.manifest.name, self.manifest.version);
        let step = Step::Manifest(&id);
        progress.started(&step);
        let result = self.write_manifest();
        progress.finished(&step, Outcome::from(&result));
        result?;

        Ok(self.manifest)
    }

    fn write_manifest(&mut self) -> Result<()> {
        let pkg_dir = &self.ctx.pkg_dir;
        fs::create_dir_all(pkg_dir).at(pkg_dir)?;

        let hashes = hash_tree(pkg_dir, &self.ctx.manifest_name)?;
        self.manifest.set_files(hashes);

        let path = self.ctx.manifest_path();
        self.manifest.write(&path)?;
        info!(path = %path.display(), files = self.manifest.files.len(), "manifest written");
        Ok(())
    }
}

/// Result of building one package.
#[derive(Debug)]
pub enum BuildStatus {
    /// Sources were fetched, and the manifest and archive were written.
    Built { manifest: Manifest, archive: PathBuf },
    /// Every source was already present; nothing was written.
    Skipped,
}

impl BuildStatus {
    pub fn is_skipped(&self) -> bool {
        matches!(self, BuildStatus::Skipped)
    }
}

/// Build one package, including its archive.
pub fn build_package(
    package: &PackageDescriptor,
    ctx: &BuildContext,
    progress: &dyn Progress,
) -> Result<BuildStatus> {
    let builder = ManifestBuilder::new(package, ctx)?;
    if builder.would_skip() {
        info!(package = %package.id(), "all sources present, skipping");
        progress.skipped(&package.id());
        return Ok(BuildStatus::Skipped);
    }

    let manifest = builder.build(progress)?;

    let id = package.id();
    let archive = ctx.archive_path(package);
    let step = Step::Archive(&id);
    progress.started(&step);
    let result = create_archive(&ctx.pkg_dir, &archive);
    progress.finished(&step, Outcome::from(&result));
    result?;

    Ok(BuildStatus::Built { manifest, archive })
}

/// Outcome of one package from a descriptor file.
#[derive(Debug)]
pub struct PackageReport {
    pub id: String,
    pub result: Result<BuildStatus>,
}

/// Build every package described in `path`, in order.
///
/// A descriptor that cannot be loaded fails as a whole. A failing package is
/// recorded in its report and the remaining packages are still built.
pub fn build_descriptor_file(path: &Path, settings: &Settings, progress: &dyn Progress) -> Result<Vec<PackageReport>> {
    let packages = load_descriptors(path)?;
    fs::create_dir_all(&settings.build_dir).at(&settings.build_dir)?;

    let reports = packages
        .iter()
        .map(|package| {
            let result = BuildContext::new(settings, path, package).and_then(|ctx| build_package(package, &ctx, progress));
            if let Err(e) = &result {
                warn!(package = %package.id(), error = %e, "package build failed");
            }
            PackageReport {
                id: package.id(),
                result,
            }
        })
        .collect();

    Ok(reports)
}
