//! Recursive discovery of the remote tree.
//!
//! [`TreeScraper`] walks the remote hierarchy depth-first in pre-order, one
//! listing request at a time, and flattens it into a [`Manifest`]. The walk
//! keeps an explicit stack of partially consumed listings instead of
//! recursing, so the accumulated manifest is owned by a single loop.
//!
//! Any listing failure aborts the whole scrape: a partial manifest cannot be
//! mirrored safely.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, instrument};
use url::Url;

use crate::listing::{EntryKind, ListingEntry, ListingError, ListingSource};
use crate::manifest::{FileEntry, FolderPath, Manifest};
use crate::progress::ProgressObserver;

/// Default maximum folder nesting depth.
///
/// The remote tree is expected to be acyclic, but servers that follow
/// symlinks can expose loops; the bound turns those into an error instead
/// of unbounded traversal.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Errors that abort a scrape.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// A folder listing could not be fetched or parsed.
    #[error("failed to list {path}: {source}")]
    Listing {
        /// The folder whose listing failed.
        path: FolderPath,
        /// The underlying listing error.
        #[source]
        source: ListingError,
    },

    /// The tree is nested deeper than the configured limit.
    #[error("folder {path} exceeds maximum depth {max_depth} (possible symlink loop)")]
    DepthLimit {
        /// The first folder beyond the limit.
        path: FolderPath,
        /// The configured limit.
        max_depth: usize,
    },
}

/// A listing whose entries are being consumed.
struct Frame {
    path: FolderPath,
    entries: std::vec::IntoIter<ListingEntry>,
}

/// Depth-first walker producing a flat manifest.
pub struct TreeScraper<'a> {
    source: &'a dyn ListingSource,
    progress: Arc<dyn ProgressObserver>,
    max_depth: usize,
}

impl<'a> TreeScraper<'a> {
    /// Creates a scraper over `source` with the default depth limit.
    #[must_use]
    pub fn new(source: &'a dyn ListingSource, progress: Arc<dyn ProgressObserver>) -> Self {
        Self {
            source,
            progress,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the maximum folder nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Walks the tree under `root` and returns every folder and file in pre-order.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Listing`] if any folder cannot be listed and
    /// [`ScrapeError::DepthLimit`] if nesting exceeds the configured limit.
    #[instrument(skip(self), fields(root = %root, max_depth = self.max_depth))]
    pub async fn scrape(&self, root: &Url) -> Result<Manifest, ScrapeError> {
        let mut manifest = Manifest::default();
        let mut stack = vec![self.open(root, FolderPath::root()).await?];

        while let Some(frame) = stack.last_mut() {
            let Some(entry) = frame.entries.next() else {
                stack.pop();
                continue;
            };

            match entry.kind {
                EntryKind::File => {
                    manifest
                        .files
                        .push(FileEntry::new(entry.base_name, frame.path.clone()));
                }
                EntryKind::Folder => {
                    let child = frame.path.child(entry.base_name);
                    if child.depth() > self.max_depth {
                        return Err(ScrapeError::DepthLimit {
                            path: child,
                            max_depth: self.max_depth,
                        });
                    }
                    manifest.folders.push(child.clone());
                    let child_frame = self.open(root, child).await?;
                    stack.push(child_frame);
                }
            }
            self.progress.on_scrape_progress(manifest.files.len());
        }

        info!(
            folders = manifest.folders.len(),
            files = manifest.files.len(),
            "scrape complete"
        );
        self.progress.on_scrape_complete(manifest.files.len());
        Ok(manifest)
    }

    async fn open(&self, root: &Url, path: FolderPath) -> Result<Frame, ScrapeError> {
        let url = path.listing_url(root);
        debug!(folder = %path, url = %url, "listing folder");
        match self.source.fetch_listing(&url).await {
            Ok(entries) => Ok(Frame {
                path,
                entries: entries.into_iter(),
            }),
            Err(source) => Err(ScrapeError::Listing { path, source }),
        }
    }
}
