//! Progress observation for the scrape and download phases.

use crate::manifest::FileEntry;
use crate::transfer::TransferOutcome;

/// Trait for receiving progress updates during a mirror run.
///
/// Progress is a side channel: nothing in the pipeline depends on what an
/// observer does with these calls. All methods have default no-op
/// implementations.
pub trait ProgressObserver: Send + Sync {
    /// Called after each listing entry is processed with the number of files found so far.
    fn on_scrape_progress(&self, _files_found: usize) {}

    /// Called once the manifest is complete.
    fn on_scrape_complete(&self, _total_files: usize) {}

    /// Called before the first transfer is dispatched.
    fn on_download_start(&self, _total: usize) {}

    /// Called when a transfer holds a pool slot and begins work.
    fn on_transfer_start(&self, _entry: &FileEntry) {}

    /// Called when a transfer finishes, with the cumulative number of finished transfers.
    fn on_transfer_complete(&self, _completed: usize, _outcome: &TransferOutcome) {}

    /// Called after every transfer has been collected.
    fn on_download_complete(&self) {}
}

/// A null progress implementation that ignores all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}
