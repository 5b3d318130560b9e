//! Bounded-concurrency execution of a manifest.
//!
//! The [`DownloadScheduler`] turns each [`FileEntry`] into a
//! [`TransferTask`] and runs them with at most `concurrency` in flight.
//!
//! # Concurrency Model
//!
//! - A semaphore permit is acquired before each task is spawned, so the
//!   manifest is consumed in order and never more than `concurrency` tasks exist
//! - Each transfer runs in its own Tokio task and releases its permit on exit (RAII)
//! - Every task hands its outcome back through its join handle into a slot
//!   reserved for its manifest index; no shared collection is mutated
//! - A panicking task still yields a `Failed` outcome for its entry

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::http::HttpClient;
use crate::manifest::FileEntry;
use crate::progress::ProgressObserver;
use crate::transfer::{TransferOutcome, TransferStatus, TransferTask};

/// Minimum allowed concurrency value.
pub const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
pub const MAX_CONCURRENCY: usize = 100;

/// Default concurrency if not specified.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Error type for scheduler operations.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },

    /// Semaphore was closed unexpectedly.
    #[error("semaphore closed unexpectedly")]
    SemaphoreClosed,
}

/// Runs a manifest through a fixed-size pool of transfers.
#[derive(Debug)]
pub struct DownloadScheduler {
    /// Semaphore for concurrency control.
    semaphore: Arc<Semaphore>,
    /// Configured concurrency limit.
    concurrency: usize,
}

impl DownloadScheduler {
    /// Creates a scheduler allowing at most `concurrency` transfers in flight.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConcurrency`] if the value is outside
    /// the valid range (1-100).
    ///
    /// # Example
    ///
    /// ```
    /// use serve_clone::DownloadScheduler;
    ///
    /// let scheduler = DownloadScheduler::new(10).unwrap();
    /// assert_eq!(scheduler.concurrency(), 10);
    /// ```
    #[instrument(level = "debug")]
    pub fn new(concurrency: usize) -> Result<Self, SchedulerError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(SchedulerError::InvalidConcurrency { value: concurrency });
        }

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
        })
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Transfers every entry of `files` from `root` into `base_dir`.
    ///
    /// Returns exactly one outcome per entry, in manifest order, regardless of
    /// the order in which transfers finished.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::SemaphoreClosed`] if the pool semaphore is
    /// closed. Individual transfer failures are never errors here; they are
    /// `Failed` outcomes.
    #[instrument(skip(self, files, client, progress), fields(files = files.len(), concurrency = self.concurrency))]
    pub async fn run(
        &self,
        files: &[FileEntry],
        root: &Url,
        base_dir: &Path,
        client: &HttpClient,
        progress: Arc<dyn ProgressObserver>,
    ) -> Result<Vec<TransferOutcome>, SchedulerError> {
        let total = files.len();
        let completed = Arc::new(AtomicUsize::new(0));
        let mut handles: Vec<JoinHandle<TransferOutcome>> = Vec::with_capacity(total);

        info!(total, "starting downloads");
        progress.on_download_start(total);

        for entry in files {
            let task = TransferTask::for_entry(entry.clone(), root, base_dir);

            // Acquire semaphore permit (blocks if at concurrency limit)
            let permit = self
                .semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| SchedulerError::SemaphoreClosed)?;

            let client = client.clone();
            let progress = Arc::clone(&progress);
            let completed = Arc::clone(&completed);

            handles.push(tokio::spawn(async move {
                // Permit is dropped when this block exits (RAII)
                let _permit = permit;

                progress.on_transfer_start(task.entry());
                let outcome = task.run(&client).await;
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                progress.on_transfer_complete(done, &outcome);
                outcome
            }));
        }

        debug!(task_count = handles.len(), "waiting for downloads to complete");

        let mut slots: Vec<Option<TransferOutcome>> = vec![None; total];
        for (index, handle) in handles.into_iter().enumerate() {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(join_error) => {
                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    let outcome = panicked_outcome(&files[index], root, base_dir, &join_error);
                    progress.on_transfer_complete(done, &outcome);
                    outcome
                }
            };
            slots[index] = Some(outcome);
        }

        progress.on_download_complete();

        let outcomes: Vec<TransferOutcome> = slots.into_iter().flatten().collect();
        info!(outcomes = outcomes.len(), "downloads complete");
        Ok(outcomes)
    }
}

/// Builds the `Failed` outcome for a task that panicked instead of returning.
fn panicked_outcome(
    entry: &FileEntry,
    root: &Url,
    base_dir: &Path,
    join_error: &tokio::task::JoinError,
) -> TransferOutcome {
    warn!(entry = %entry, error = %join_error, "transfer task panicked");
    let url = entry.remote_url(root);
    let path: PathBuf = entry.local_path(base_dir);
    TransferOutcome::new(
        entry.clone(),
        TransferStatus::Failed,
        format!(
            "Failed to download - {url} - {}: task panic: {join_error}",
            path.display()
        ),
    )
}
