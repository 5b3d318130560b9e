//! Error types for directory listing fetches.

use thiserror::Error;

use crate::http::HttpError;

/// A remote listing could not be fetched or understood.
#[derive(Debug, Error)]
pub enum ListingError {
    /// The GET request itself failed (network, timeout, non-success status).
    #[error(transparent)]
    Request(#[from] HttpError),

    /// The body was read but did not have the expected listing shape.
    #[error("malformed listing from {url}: {source}")]
    Malformed {
        /// The listing URL.
        url: String,
        /// The JSON decoding error.
        #[source]
        source: serde_json::Error,
    },

    /// The response body could not be read.
    #[error("failed reading listing body from {url}: {source}")]
    Body {
        /// The listing URL.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The root probe returned an empty `directory` field.
    #[error("{url} is not serving a directory listing")]
    MissingDirectory {
        /// The probed URL.
        url: String,
    },

    /// An entry name would escape its parent directory when mirrored.
    #[error("unsafe entry name {name:?} in listing from {url}")]
    UnsafeEntryName {
        /// The listing URL.
        url: String,
        /// The offending name, after trailing-separator normalization.
        name: String,
    },
}

impl ListingError {
    /// Creates a malformed-body error.
    pub fn malformed(url: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Malformed {
            url: url.into(),
            source,
        }
    }

    /// Creates an unsafe-name error.
    pub fn unsafe_name(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnsafeEntryName {
            url: url.into(),
            name: name.into(),
        }
    }
}
