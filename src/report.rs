//! Outcome aggregation and the failure log artifact.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{info, instrument};
use url::Url;

use crate::transfer::{TransferOutcome, TransferStatus};

/// Counts and failure details for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Files fetched during this run.
    pub downloaded: usize,
    /// Files skipped because they already existed locally.
    pub already_present: usize,
    /// Files that could not be fetched.
    pub failed: usize,
    /// Detail string of every failure, in the order outcomes were folded.
    pub errors: Vec<String>,
}

impl Report {
    /// Folds one outcome into the report.
    pub fn record(&mut self, outcome: &TransferOutcome) {
        match outcome.status {
            TransferStatus::Downloaded => self.downloaded += 1,
            TransferStatus::AlreadyPresent => self.already_present += 1,
            TransferStatus::Failed => {
                self.failed += 1;
                self.errors.push(outcome.detail.clone());
            }
        }
    }

    /// Returns the number of outcomes folded in.
    #[must_use]
    pub fn total(&self) -> usize {
        self.downloaded + self.already_present + self.failed
    }

    /// Returns true if at least one transfer failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Folds outcomes into a [`Report`].
///
/// Counts depend only on the multiset of outcomes; `errors` keeps the order
/// in which failed outcomes appear in `outcomes`.
pub fn aggregate<'a>(outcomes: impl IntoIterator<Item = &'a TransferOutcome>) -> Report {
    outcomes
        .into_iter()
        .fold(Report::default(), |mut report, outcome| {
            report.record(outcome);
            report
        })
}

const LOG_SEPARATOR_WIDTH: usize = 80;

/// Returns the error log file name for a run started at `time`.
#[must_use]
pub fn error_log_file_name(time: SystemTime) -> String {
    let millis = time
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("serve-clone-errors-{millis}.log")
}

/// Renders the failure log for a run.
#[must_use]
pub fn render_error_log(root: &Url, base_dir: &Path, time: SystemTime, report: &Report) -> String {
    let mut log = format!(
        "URL:               {root}\n\
         Base Directory:    {}\n\
         Time:              {}\n\
         {}\n",
        base_dir.display(),
        httpdate::fmt_http_date(time),
        "-".repeat(LOG_SEPARATOR_WIDTH)
    );
    for error in &report.errors {
        log.push_str(error);
        log.push('\n');
    }
    log
}

/// Writes the failure log for a run into `log_dir` and returns its path.
///
/// # Errors
///
/// Returns the IO error if the directory cannot be created or the file written.
#[instrument(skip(root, base_dir, report), fields(log_dir = %log_dir.display(), failures = report.failed))]
pub async fn write_error_log(
    log_dir: &Path,
    root: &Url,
    base_dir: &Path,
    time: SystemTime,
    report: &Report,
) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(log_dir).await?;
    let path = log_dir.join(error_log_file_name(time));
    tokio::fs::write(&path, render_error_log(root, base_dir, time, report)).await?;
    info!(path = %path.display(), "wrote error log");
    Ok(path)
}
