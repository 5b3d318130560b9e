//! Terminal progress bars for the scrape and download phases.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serve_clone::{ProgressObserver, TransferOutcome};
use tracing::debug;

const SCRAPE_TEMPLATE: &str = "{spinner:.cyan} Identifying files || {pos} Files";
const DOWNLOAD_TEMPLATE: &str =
    "Downloading files |{bar:40.cyan}| {percent}% || {pos}/{len} Files";

/// Renders mirror progress with two `indicatif` bars.
///
/// The scrape bar is a spinner with a running file count since the total is
/// only known once the walk ends; the download bar is a bounded bar.
pub(crate) struct ProgressBars {
    scrape: ProgressBar,
    download: ProgressBar,
}

impl ProgressBars {
    /// Creates visible bars, or hidden ones when `enabled` is false.
    pub(crate) fn new(enabled: bool) -> Self {
        if !enabled {
            return Self {
                scrape: ProgressBar::hidden(),
                download: ProgressBar::hidden(),
            };
        }

        let scrape = ProgressBar::new_spinner();
        scrape.set_style(
            ProgressStyle::with_template(SCRAPE_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        scrape.enable_steady_tick(Duration::from_millis(100));

        let download = ProgressBar::new(0);
        download.set_style(
            ProgressStyle::with_template(DOWNLOAD_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█░"),
        );

        Self { scrape, download }
    }
}

impl ProgressObserver for ProgressBars {
    fn on_scrape_progress(&self, files_found: usize) {
        self.scrape.set_position(files_found as u64);
    }

    fn on_scrape_complete(&self, total_files: usize) {
        debug!(total_files, "scrape bar finished");
        self.scrape.finish_and_clear();
    }

    fn on_download_start(&self, total: usize) {
        self.download.set_length(total as u64);
        self.download.set_position(0);
    }

    fn on_transfer_complete(&self, completed: usize, _outcome: &TransferOutcome) {
        self.download.set_position(completed as u64);
    }

    fn on_download_complete(&self) {
        self.download.finish();
    }
}

impl Drop for ProgressBars {
    fn drop(&mut self) {
        // Leaves the terminal clean when a scrape error aborts the run.
        if !self.scrape.is_finished() {
            self.scrape.finish_and_clear();
        }
        if !self.download.is_finished() {
            self.download.abandon();
        }
    }
}
