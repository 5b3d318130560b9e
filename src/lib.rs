//! serve-clone core library
//!
//! Mirrors a remote directory tree, exposed as JSON directory listings by a
//! static file server, onto the local filesystem.
//!
//! # Architecture
//!
//! - [`listing`] - fetch and parse one folder listing
//! - [`scrape`] - depth-first walk of the remote tree into a [`Manifest`]
//! - [`transfer`] - download one file with skip-if-present semantics
//! - [`scheduler`] - bounded-concurrency execution of a manifest
//! - [`report`] - outcome aggregation and the failure log
//! - [`mirror`] - the end-to-end pipeline tying the above together

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod http;
pub mod listing;
pub mod manifest;
pub mod mirror;
pub mod progress;
pub mod report;
pub mod scheduler;
pub mod scrape;
pub mod transfer;
pub mod validate;

mod user_agent;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::MirrorConfig;
pub use http::{HttpClient, HttpError};
pub use listing::{EntryKind, ListingClient, ListingEntry, ListingError, ListingSource};
pub use manifest::{FileEntry, FolderPath, Manifest};
pub use mirror::{Mirror, MirrorError, MirrorRun, mirror};
pub use progress::{NoProgress, ProgressObserver};
pub use report::{Report, aggregate, write_error_log};
pub use scheduler::{DEFAULT_CONCURRENCY, DownloadScheduler, SchedulerError};
pub use scrape::{DEFAULT_MAX_DEPTH, ScrapeError, TreeScraper};
pub use transfer::{TransferError, TransferOutcome, TransferStatus, TransferTask};
pub use validate::ValidationError;
