//! Run configuration.

use std::path::PathBuf;

use crate::http::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use crate::scheduler::DEFAULT_CONCURRENCY;
use crate::scrape::DEFAULT_MAX_DEPTH;

/// Configuration for one mirror run.
///
/// `root_url` and `base_dir` are raw user input; they are validated when the
/// run is prepared, not here.
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// Root of the remote listing.
    pub root_url: String,
    /// Local destination directory.
    pub base_dir: PathBuf,
    /// Maximum number of concurrent file transfers.
    pub concurrency: usize,
    /// Maximum folder nesting depth followed by the scrape.
    pub max_depth: usize,
    /// HTTP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// HTTP read timeout in seconds.
    pub read_timeout_secs: u64,
}

impl MirrorConfig {
    /// Creates a configuration with default limits and timeouts.
    #[must_use]
    pub fn new(root_url: impl Into<String>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_url: root_url.into(),
            base_dir: base_dir.into(),
            concurrency: DEFAULT_CONCURRENCY,
            max_depth: DEFAULT_MAX_DEPTH,
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
        }
    }

    /// Sets the number of concurrent file transfers.
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Sets the maximum folder nesting depth.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the HTTP connect and read timeouts in seconds.
    #[must_use]
    pub const fn with_timeouts(mut self, connect_secs: u64, read_secs: u64) -> Self {
        self.connect_timeout_secs = connect_secs;
        self.read_timeout_secs = read_secs;
        self
    }
}
