//! Progress reporting hooks for package builds.
//!
//! The library never prints; front ends implement [`Progress`] to show what a
//! build is doing.

use std::fmt;

use url::Url;

/// A reportable build step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<'a> {
    /// Fetching one source file.
    Download(&'a Url),
    /// Hashing the package directory and writing the manifest, by package id.
    Manifest(&'a str),
    /// Writing the archive, by package id.
    Archive(&'a str),
}

impl fmt::Display for Step<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Download(url) => write!(f, "Download {}", url),
            Step::Manifest(id) => write!(f, "Data {}", id),
            Step::Archive(id) => write!(f, "Tar {}", id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Failed,
}

impl<T, E> From<&Result<T, E>> for Outcome {
    fn from(result: &Result<T, E>) -> Self {
        if result.is_ok() { Outcome::Ok } else { Outcome::Failed }
    }
}

/// Receives step notifications during a package build.
pub trait Progress {
    /// A step is about to run.
    fn started(&self, step: &Step<'_>);

    /// A step has completed.
    fn finished(&self, step: &Step<'_>, outcome: Outcome);

    /// A whole package was skipped because all its sources are present.
    fn skipped(&self, package_id: &str);
}

/// A [`Progress`] that discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn started(&self, _step: &Step<'_>) {}

    fn finished(&self, _step: &Step<'_>, _outcome: Outcome) {}

    fn skipped(&self, _package_id: &str) {}
}
