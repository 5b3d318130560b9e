//! Directory listing client.
//!
//! The remote server answers a GET on any folder URL with a JSON body of the
//! form:
//!
//! ```json
//! { "directory": "/share", "files": [ { "type": "folder", "base": "a/" },
//!                                     { "type": "file",   "base": "x.txt" } ] }
//! ```
//!
//! Folder names carry a trailing `/` in `base`; it is stripped before the name
//! becomes a path segment. Entries of any other `type` are ignored.

mod error;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

pub use error::ListingError;

use crate::http::{HttpClient, HttpError};

/// Kind of a listing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file to be downloaded.
    File,
    /// A sub-directory to be traversed.
    Folder,
}

/// One child of a listed directory, with its name normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Whether the entry is a file or a folder.
    pub kind: EntryKind,
    /// Entry name without any trailing separator.
    pub base_name: String,
}

impl ListingEntry {
    /// Creates a file entry.
    #[must_use]
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::File,
            base_name: name.into(),
        }
    }

    /// Creates a folder entry.
    #[must_use]
    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::Folder,
            base_name: name.into(),
        }
    }
}

// ==================== Wire Types ====================

#[derive(Debug, Deserialize)]
struct RawListing {
    files: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(rename = "type")]
    kind: RawKind,
    base: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawKind {
    File,
    Folder,
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct RawRootProbe {
    #[serde(default)]
    directory: Option<String>,
}

/// Parses one listing body into normalized entries, preserving server order.
///
/// # Errors
///
/// Returns [`ListingError::Malformed`] when the body is not a listing and
/// [`ListingError::UnsafeEntryName`] when a name cannot be mirrored safely.
pub fn parse_listing(url: &str, body: &[u8]) -> Result<Vec<ListingEntry>, ListingError> {
    let raw: RawListing =
        serde_json::from_slice(body).map_err(|e| ListingError::malformed(url, e))?;

    let mut entries = Vec::with_capacity(raw.files.len());
    for entry in raw.files {
        let (kind, name) = match entry.kind {
            RawKind::File => (EntryKind::File, entry.base.as_str()),
            RawKind::Folder => (EntryKind::Folder, entry.base.trim_end_matches('/')),
            RawKind::Other => {
                debug!(url, base = %entry.base, "ignoring listing entry of unknown type");
                continue;
            }
        };
        if !is_safe_name(name) {
            return Err(ListingError::unsafe_name(url, name));
        }
        entries.push(ListingEntry {
            kind,
            base_name: name.to_string(),
        });
    }
    Ok(entries)
}

fn is_safe_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

/// Source of directory listings.
///
/// [`ListingClient`] is the HTTP implementation; the scraper only depends on
/// this trait so traversal can be exercised without a server.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetches and parses the listing at `url`.
    async fn fetch_listing(&self, url: &Url) -> Result<Vec<ListingEntry>, ListingError>;
}

/// Fetches directory listings over HTTP.
#[derive(Debug, Clone)]
pub struct ListingClient {
    http: HttpClient,
}

impl ListingClient {
    /// Creates a listing client on top of a shared HTTP client.
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Checks that `root` is serving a directory listing.
    ///
    /// The root response must carry a non-empty `directory` field.
    ///
    /// # Errors
    ///
    /// Returns the request error when the root cannot be fetched,
    /// [`ListingError::Malformed`] for a non-JSON body and
    /// [`ListingError::MissingDirectory`] when `directory` is absent or empty.
    #[instrument(skip(self), fields(url = %root))]
    pub async fn probe_root(&self, root: &Url) -> Result<(), ListingError> {
        let body = self.fetch_body(root).await?;
        let probe: RawRootProbe = serde_json::from_slice(&body)
            .map_err(|e| ListingError::malformed(root.as_str(), e))?;
        match probe.directory {
            Some(directory) if !directory.is_empty() => {
                debug!(%directory, "root is serving a directory");
                Ok(())
            }
            _ => Err(ListingError::MissingDirectory {
                url: root.to_string(),
            }),
        }
    }

    async fn fetch_body(&self, url: &Url) -> Result<Vec<u8>, ListingError> {
        let response = self.http.get(url).await?;
        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                ListingError::Request(HttpError::timeout(url.as_str()))
            } else {
                ListingError::Body {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl ListingSource for ListingClient {
    #[instrument(skip(self), fields(url = %url))]
    async fn fetch_listing(&self, url: &Url) -> Result<Vec<ListingEntry>, ListingError> {
        let body = self.fetch_body(url).await?;
        let entries = parse_listing(url.as_str(), &body)?;
        debug!(entries = entries.len(), "listing fetched");
        Ok(entries)
    }
}
