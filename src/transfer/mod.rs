//! Single-file transfer: existence check, streaming copy, failure capture.
//!
//! A [`TransferTask`] never returns an error. Every path through
//! [`TransferTask::run`] ends in exactly one [`TransferOutcome`], so a failing
//! file cannot abort the batch it belongs to.
//!
//! Re-running against a partially mirrored destination only fills gaps: a
//! file that already exists locally is reported as
//! [`TransferStatus::AlreadyPresent`] without touching the network.

mod error;

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument, warn};
use url::Url;

pub use error::TransferError;

use crate::http::HttpClient;
use crate::manifest::FileEntry;

/// Terminal state of one manifest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStatus {
    /// The file was fetched and written in full.
    Downloaded,
    /// A file already existed at the local path; nothing was fetched.
    AlreadyPresent,
    /// The transfer failed; no file was left behind.
    Failed,
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Downloaded => "downloaded",
            Self::AlreadyPresent => "already present",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Result of attempting to materialize one manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    /// The entry this outcome belongs to.
    pub entry: FileEntry,
    /// How the attempt ended.
    pub status: TransferStatus,
    /// Human-readable description naming the URL and local path.
    pub detail: String,
}

impl TransferOutcome {
    /// Creates an outcome.
    #[must_use]
    pub fn new(entry: FileEntry, status: TransferStatus, detail: impl Into<String>) -> Self {
        Self {
            entry,
            status,
            detail: detail.into(),
        }
    }

    /// Returns true for [`TransferStatus::Failed`].
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.status == TransferStatus::Failed
    }
}

/// One file to materialize: where it comes from and where it goes.
#[derive(Debug, Clone)]
pub struct TransferTask {
    entry: FileEntry,
    remote_url: Url,
    local_path: PathBuf,
}

impl TransferTask {
    /// Creates a task for explicit source and destination.
    #[must_use]
    pub fn new(entry: FileEntry, remote_url: Url, local_path: PathBuf) -> Self {
        Self {
            entry,
            remote_url,
            local_path,
        }
    }

    /// Creates the task for `entry`, deriving the URL from `root` and the path from `base_dir`.
    #[must_use]
    pub fn for_entry(entry: FileEntry, root: &Url, base_dir: &Path) -> Self {
        let remote_url = entry.remote_url(root);
        let local_path = entry.local_path(base_dir);
        Self::new(entry, remote_url, local_path)
    }

    /// Returns the manifest entry.
    #[must_use]
    pub fn entry(&self) -> &FileEntry {
        &self.entry
    }

    /// Returns the destination path.
    #[must_use]
    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    /// Runs the transfer to completion and reports how it ended.
    #[instrument(skip(self, client), fields(url = %self.remote_url, path = %self.local_path.display()))]
    pub async fn run(self, client: &HttpClient) -> TransferOutcome {
        match self.materialize(client).await {
            Ok(TransferStatus::AlreadyPresent) => {
                debug!("already present, skipping");
                let detail = format!(
                    "Already downloaded - {} - {}",
                    self.remote_url,
                    self.local_path.display()
                );
                TransferOutcome::new(self.entry, TransferStatus::AlreadyPresent, detail)
            }
            Ok(status) => {
                let detail = format!(
                    "Finished downloading - {} - {}",
                    self.remote_url,
                    self.local_path.display()
                );
                TransferOutcome::new(self.entry, status, detail)
            }
            Err(failure) => {
                warn!(error = %failure.error, "transfer failed");
                let detail = failure_detail(&self.remote_url, &self.local_path, &failure);
                TransferOutcome::new(self.entry, TransferStatus::Failed, detail)
            }
        }
    }

    async fn materialize(&self, client: &HttpClient) -> Result<TransferStatus, Failure> {
        if let Some(parent) = self
            .local_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            // create_dir_all tolerates ancestors created concurrently by sibling tasks.
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Failure::without_file(TransferError::io(parent, e)))?;
        }

        let exists = tokio::fs::try_exists(&self.local_path)
            .await
            .map_err(|e| Failure::without_file(TransferError::io(&self.local_path, e)))?;
        if exists {
            return Ok(TransferStatus::AlreadyPresent);
        }

        // create_new closes the window between the existence check and the write.
        let file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.local_path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Ok(TransferStatus::AlreadyPresent);
            }
            Err(e) => {
                return Err(Failure::without_file(TransferError::io(
                    &self.local_path,
                    e,
                )));
            }
        };

        let result = self.fetch_into(client, file).await;
        match result {
            Ok(bytes) => {
                info!(bytes, "download complete");
                Ok(TransferStatus::Downloaded)
            }
            Err(error) => {
                debug!(path = %self.local_path.display(), "cleaning up partial file after error");
                let cleanup_error = remove_partial(&self.local_path).await;
                Err(Failure {
                    error,
                    cleanup_error,
                })
            }
        }
    }

    async fn fetch_into(&self, client: &HttpClient, file: File) -> Result<u64, TransferError> {
        let response = client.get(&self.remote_url).await?;
        stream_to_file(file, response, self.remote_url.as_str(), &self.local_path).await
    }
}

/// A failed transfer plus any error hit while removing the partial file.
struct Failure {
    error: TransferError,
    cleanup_error: Option<std::io::Error>,
}

impl Failure {
    fn without_file(error: TransferError) -> Self {
        Self {
            error,
            cleanup_error: None,
        }
    }
}

/// Renders the `Failed` detail, including a cleanup error if one occurred.
fn failure_detail(url: &Url, path: &Path, failure: &Failure) -> String {
    let mut detail = format!(
        "Failed to download - {url} - {}: {}",
        path.display(),
        failure.error
    );
    if let Some(cleanup) = &failure.cleanup_error {
        detail.push_str("; cleanup failed: ");
        detail.push_str(&cleanup.to_string());
    }
    detail
}

/// Removes a partially written file, returning the error if removal failed.
async fn remove_partial(path: &Path) -> Option<std::io::Error> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => None,
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to remove partial file");
            Some(e)
        }
    }
}

/// Streams response body to file, returning bytes written.
///
/// The file handle is consumed and closed before returning so the caller can
/// delete the file on error.
async fn stream_to_file(
    file: File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, TransferError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| TransferError::stream(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| TransferError::io(file_path, e))?;

        bytes_written += chunk.len() as u64;
    }

    // Ensure all data is flushed to disk
    writer
        .flush()
        .await
        .map_err(|e| TransferError::io(file_path, e))?;

    Ok(bytes_written)
}
