//! Error types for single-file transfers.
//!
//! A [`TransferError`] never escapes the transfer boundary: it is rendered
//! into the detail string of a `Failed` outcome.

use std::path::PathBuf;

use thiserror::Error;

use crate::http::HttpError;

/// Errors that can occur while materializing one file.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The GET request failed or returned a non-success status.
    #[error(transparent)]
    Request(#[from] HttpError),

    /// The response body stream was interrupted.
    #[error("stream interrupted downloading {url}: {source}")]
    Stream {
        /// The URL being streamed.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// File system error (create directory, create file, write, etc.)
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl TransferError {
    /// Creates a stream error, promoting reqwest timeouts to a request timeout.
    pub fn stream(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Request(HttpError::timeout(url))
        } else {
            Self::Stream {
                url: url.into(),
                source,
            }
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
