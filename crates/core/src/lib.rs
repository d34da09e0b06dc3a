//! mkpkg-core: Core logic for mkpkg
//!
//! This crate turns package descriptors into distributable archives:
//! - `descriptor`: loading and validating YAML package descriptors
//! - `fetch`: downloading declared sources, skipping those already present
//! - `hash`: SHA256 digests of the package payload
//! - `manifest`: the JSON manifest shipped inside each package
//! - `archive`: bundling the package directory into a tar file
//! - `build`: orchestration of the steps above for each package

pub mod archive;
pub mod build;
pub mod config;
pub mod context;
pub mod descriptor;
mod error;
pub mod fetch;
pub mod hash;
pub mod manifest;
pub mod progress;
pub mod vars;
pub mod version;

pub use build::{BuildStatus, ManifestBuilder, PackageReport, build_descriptor_file, build_package};
pub use config::Settings;
pub use context::BuildContext;
pub use descriptor::PackageDescriptor;
pub use error::{DescriptorError, Error, FetchError};
pub use manifest::Manifest;
pub use progress::{NoProgress, Outcome, Progress, Step};

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;
