//! Source fetching for package directories
//!
//! Every declared source maps a target path inside the package directory to a
//! locator. Locators are URL-joined against the descriptor directory, so they
//! can be remote `http(s)` URLs, `file:` URLs or plain relative paths.
//!
//! Downloads are streamed into `<target>.part` and renamed into place once
//! complete. A target that already exists is never fetched again.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use percent_encoding::percent_decode_str;
use reqwest::blocking::Client;
use tracing::{debug, info, warn};
use url::Url;

use crate::context::BuildContext;
use crate::error::{FetchError, IoContext};
use crate::progress::{Outcome, Progress, Step};
use crate::{Error, Result};

/// Suffix of the temporary file a download is written to.
pub const PART_SUFFIX: &str = ".part";

/// A single source file to place in the package directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Target path relative to the package directory, after expansion.
    pub target: String,
    /// Absolute destination path.
    pub dest: PathBuf,
    /// Fully resolved source URL.
    pub url: Url,
}

impl Download {
    /// Resolve one `target -> locator` entry against `ctx`.
    ///
    /// A target with an empty file name (`mods/`) is completed with the last
    /// path segment of the resolved URL.
    pub fn resolve(ctx: &BuildContext, target: &str, locator: &str) -> Result<Self> {
        let target = ctx.variables.expand(target);
        let locator = ctx.variables.expand(locator);
        let url = resolve_locator(&ctx.work_dir, &locator)?;

        let target = if names_directory(&target) {
            let file_name = url_file_name(&url).ok_or_else(|| FetchError::NoFileName {
                target: target.clone(),
                url: url.to_string(),
            })?;
            format!("{}{}", target, file_name)
        } else {
            target
        };

        let dest = ctx.pkg_dir.join(&target);
        Ok(Self { target, dest, url })
    }

    /// Whether the destination file is already present.
    pub fn skip(&self) -> bool {
        self.dest.exists()
    }

    /// Path of the temporary file used while downloading.
    pub fn part_path(&self) -> PathBuf {
        let mut name = self.dest.clone().into_os_string();
        name.push(PART_SUFFIX);
        PathBuf::from(name)
    }
}

/// Whether a target only names a directory.
fn names_directory(target: &str) -> bool {
    target.is_empty() || target.ends_with('/') || target.ends_with(std::path::MAIN_SEPARATOR)
}

/// Resolve `locator` against the descriptor directory.
pub fn resolve_locator(work_dir: &Path, locator: &str) -> Result<Url> {
    let base = Url::from_directory_path(work_dir).map_err(|()| FetchError::InvalidLocator {
        locator: work_dir.display().to_string(),
        source: url::ParseError::RelativeUrlWithoutBase,
    })?;

    base.join(locator).map_err(|source| {
        FetchError::InvalidLocator {
            locator: locator.to_string(),
            source,
        }
        .into()
    })
}

/// Last non-empty path segment of `url`, percent-decoded.
///
/// Returns `None` when the decoded segment is not a plain file name, e.g. an
/// encoded `%2F` or a `..` that would leave the target directory.
pub fn url_file_name(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.next_back()?;
    let name = percent_decode_str(segment).decode_utf8_lossy();
    let plain = !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', '\0']);
    plain.then(|| name.into_owned())
}

/// Fetches the declared sources of one package.
#[derive(Debug)]
pub struct SourceFetcher {
    downloads: Vec<Download>,
    user_agent: String,
    timeout: std::time::Duration,
}

impl SourceFetcher {
    /// Resolve every `target -> locator` entry in declaration order.
    pub fn new(ctx: &BuildContext, sources: &IndexMap<String, String>) -> Result<Self> {
        let downloads = sources
            .iter()
            .map(|(target, locator)| Download::resolve(ctx, target, locator))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            downloads,
            user_agent: ctx.user_agent.clone(),
            timeout: ctx.timeout,
        })
    }

    /// True when every target already exists.
    pub fn would_skip(&self) -> bool {
        self.downloads.iter().all(Download::skip)
    }

    /// Fetch every missing target, one at a time.
    ///
    /// Returns the number of files fetched. The first failure aborts the
    /// remaining downloads.
    pub fn fetch_all(&self, progress: &dyn Progress) -> Result<usize> {
        let mut client = None;
        let mut fetched = 0;

        for download in &self.downloads {
            if download.skip() {
                debug!(file = %download.target, "already present, skipping");
                continue;
            }

            let step = Step::Download(&download.url);
            progress.started(&step);
            let result = self.fetch(download, &mut client);
            progress.finished(&step, Outcome::from(&result));
            result?;
            fetched += 1;
        }

        Ok(fetched)
    }

    fn fetch(&self, download: &Download, client: &mut Option<Client>) -> Result<()> {
        info!(url = %download.url, dest = %download.dest.display(), "fetching");

        if let Some(parent) = download.dest.parent() {
            fs::create_dir_all(parent).at(parent)?;
        }

        let part = download.part_path();
        if part.exists() {
            warn!(path = %part.display(), "removing partial download from an earlier run");
            fs::remove_file(&part).at(&part)?;
        }

        let bytes = match download.url.scheme() {
            "file" => copy_local(&download.url, &part)?,
            "http" | "https" => {
                let client = match client {
                    Some(client) => client,
                    None => client.insert(self.client(&download.url)?),
                };
                copy_remote(client, &download.url, &part)?
            }
            scheme => {
                return Err(FetchError::UnsupportedScheme {
                    scheme: scheme.to_string(),
                    url: download.url.to_string(),
                }
                .into());
            }
        };

        fs::rename(&part, &download.dest).at(&download.dest)?;
        info!(path = %download.dest.display(), size = bytes, "download complete");
        Ok(())
    }

    fn client(&self, url: &Url) -> Result<Client> {
        Client::builder()
            .user_agent(self.user_agent.as_str())
            .timeout(self.timeout)
            .build()
            .map_err(|source| {
                FetchError::Http {
                    url: url.to_string(),
                    source,
                }
                .into()
            })
    }
}

fn copy_local(url: &Url, part: &Path) -> Result<u64> {
    let source = url
        .to_file_path()
        .map_err(|()| FetchError::SourceNotFound(PathBuf::from(url.path())))?;

    let mut reader = match File::open(&source) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(FetchError::SourceNotFound(source).into());
        }
        Err(e) => return Err(Error::io(source, e)),
    };

    let mut writer = File::create(part).at(part)?;
    io::copy(&mut reader, &mut writer).at(part)
}

fn copy_remote(client: &Client, url: &Url, part: &Path) -> Result<u64> {
    let http_error = |source| FetchError::Http {
        url: url.to_string(),
        source,
    };

    let mut response = client.get(url.clone()).send().map_err(http_error)?;

    if !response.status().is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        }
        .into());
    }

    let mut writer = File::create(part).at(part)?;
    Ok(response.copy_to(&mut writer).map_err(http_error)?)
}
