//! Error types for mkpkg-core

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a package descriptor.
///
/// These are reported before any download or filesystem write happens.
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("Failed to read descriptor '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed descriptor '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Document {index} of '{path}' is empty")]
    EmptyDocument { path: PathBuf, index: usize },

    #[error("Package in '{path}' is missing required field '{field}'")]
    MissingField { path: PathBuf, field: &'static str },

    #[error("Invalid variable definition '{0}', expected KEY=VALUE")]
    InvalidVariable(String),
}

/// Errors raised while fetching a source file.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid source locator '{locator}': {source}")]
    InvalidLocator {
        locator: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Unsupported URL scheme '{scheme}' in {url}")]
    UnsupportedScheme { scheme: String, url: String },

    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Source file not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Cannot derive a file name for target '{target}' from {url}")]
    NoFileName { target: String, url: String },
}

/// Errors that can occur in core operations
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("IO error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk '{path}': {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to serialize manifest: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wrap an I/O error together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Attach a path to a bare `std::io::Result`.
pub(crate) trait IoContext<T> {
    fn at(self, path: impl Into<PathBuf>) -> Result<T, Error>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at(self, path: impl Into<PathBuf>) -> Result<T, Error> {
        self.map_err(|e| Error::io(path, e))
    }
}
