//! End-to-end mirror pipeline.
//!
//! A run is prepared once (inputs validated, root probed) and then executed:
//! scrape the remote tree into a manifest, transfer every file, fold the
//! outcomes into a [`Report`]. Only preparation and the scrape can fail the
//! run; individual transfer failures are data inside the report.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use thiserror::Error;
use tracing::{info, instrument};
use url::Url;

use crate::config::MirrorConfig;
use crate::http::{HttpClient, HttpError};
use crate::listing::ListingClient;
use crate::manifest::{FolderPath, Manifest};
use crate::progress::ProgressObserver;
use crate::report::{Report, aggregate};
use crate::scheduler::{DownloadScheduler, SchedulerError};
use crate::scrape::{ScrapeError, TreeScraper};
use crate::transfer::TransferOutcome;
use crate::validate::{ValidationError, parse_root_url, resolve_base_dir};

/// Errors that stop a mirror run before any outcome is produced.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// The root URL or destination was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The HTTP client could not be built.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The remote tree could not be listed.
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    /// The download pool could not be set up or run.
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

/// Everything a finished run produced.
#[derive(Debug)]
pub struct MirrorRun {
    /// The scraped tree.
    pub manifest: Manifest,
    /// One outcome per manifest file, in manifest order.
    pub outcomes: Vec<TransferOutcome>,
    /// Counts and failure details.
    pub report: Report,
    /// When the run started.
    pub started_at: SystemTime,
}

/// A validated mirror run, ready to execute.
#[derive(Debug)]
pub struct Mirror {
    root: Url,
    base_dir: PathBuf,
    max_depth: usize,
    http: HttpClient,
    scheduler: DownloadScheduler,
}

impl Mirror {
    /// Validates `config` and checks that the root is serving a listing.
    ///
    /// Checks run in order: concurrency, URL syntax, root availability,
    /// destination path. Nothing is written locally.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Scheduler`] for an out-of-range concurrency,
    /// [`MirrorError::Validation`] for a rejected URL, unreachable root or
    /// unusable destination, and [`MirrorError::Http`] if the client cannot be built.
    #[instrument(skip(config), fields(url = %config.root_url, base_dir = %config.base_dir.display()))]
    pub async fn prepare(config: &MirrorConfig) -> Result<Self, MirrorError> {
        let scheduler = DownloadScheduler::new(config.concurrency)?;
        let root = parse_root_url(&config.root_url)?;
        let http = HttpClient::with_timeouts(config.connect_timeout_secs, config.read_timeout_secs)?;

        let probe_url = FolderPath::root().listing_url(&root);
        ListingClient::new(http.clone())
            .probe_root(&probe_url)
            .await
            .map_err(|source| ValidationError::RootUnavailable {
                url: config.root_url.clone(),
                source,
            })?;

        let base_dir = resolve_base_dir(&config.base_dir)?;

        Ok(Self {
            root,
            base_dir,
            max_depth: config.max_depth,
            http,
            scheduler,
        })
    }

    /// Returns the validated root URL.
    #[must_use]
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// Returns the absolute destination directory.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Scrapes the remote tree and downloads every file into the destination.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Scrape`] if any listing fails; no file is
    /// transferred in that case. Transfer failures are reported through the
    /// returned [`Report`] instead.
    #[instrument(skip(self, progress), fields(root = %self.root, base_dir = %self.base_dir.display()))]
    pub async fn run(&self, progress: Arc<dyn ProgressObserver>) -> Result<MirrorRun, MirrorError> {
        let started_at = SystemTime::now();
        let listing = ListingClient::new(self.http.clone());

        let manifest = TreeScraper::new(&listing, Arc::clone(&progress))
            .with_max_depth(self.max_depth)
            .scrape(&self.root)
            .await?;

        let outcomes = self
            .scheduler
            .run(&manifest.files, &self.root, &self.base_dir, &self.http, progress)
            .await?;
        let report = aggregate(&outcomes);

        info!(
            downloaded = report.downloaded,
            already_present = report.already_present,
            failed = report.failed,
            "mirror complete"
        );

        Ok(MirrorRun {
            manifest,
            outcomes,
            report,
            started_at,
        })
    }
}

/// Prepares and runs a mirror in one call.
///
/// # Errors
///
/// See [`Mirror::prepare`] and [`Mirror::run`].
pub async fn mirror(
    config: &MirrorConfig,
    progress: Arc<dyn ProgressObserver>,
) -> Result<MirrorRun, MirrorError> {
    Mirror::prepare(config).await?.run(progress).await
}
