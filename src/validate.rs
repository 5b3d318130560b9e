//! Up-front checks on the user-supplied root URL and destination.
//!
//! Everything here runs before the scrape starts; a failure means no
//! listing or file request is ever made.

use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

use crate::listing::ListingError;

/// The run cannot start with the given inputs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The root URL does not parse.
    #[error("URL is not valid -> {url}: {source}")]
    InvalidUrl {
        /// The rejected input.
        url: String,
        /// The parse error.
        #[source]
        source: url::ParseError,
    },

    /// The root URL is not http or https.
    #[error("URL is not valid -> {url}: unsupported scheme {scheme:?}")]
    UnsupportedScheme {
        /// The rejected input.
        url: String,
        /// The scheme that was found.
        scheme: String,
    },

    /// The root URL is unreachable or not serving a directory listing.
    #[error("URL is not available -> {url}: {source}")]
    RootUnavailable {
        /// The probed URL.
        url: String,
        /// Why the probe failed.
        #[source]
        source: ListingError,
    },

    /// The destination string cannot be used as a local directory.
    #[error("Directory is not valid -> {path}: {reason}")]
    InvalidDirectory {
        /// The rejected input.
        path: String,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Parses the root URL, accepting only `http` and `https`.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidUrl`] or [`ValidationError::UnsupportedScheme`].
pub fn parse_root_url(input: &str) -> Result<Url, ValidationError> {
    let url = Url::parse(input.trim()).map_err(|source| ValidationError::InvalidUrl {
        url: input.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ValidationError::UnsupportedScheme {
            url: input.to_string(),
            scheme: scheme.to_string(),
        }),
    }
}

/// Resolves the destination to an absolute path.
///
/// The directory does not need to exist yet; it is created on the first
/// download. An existing non-directory at that path is rejected.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidDirectory`] for empty input, embedded NUL
/// bytes, paths that cannot be made absolute, or paths naming a file.
pub fn resolve_base_dir(input: &Path) -> Result<PathBuf, ValidationError> {
    let invalid = |reason| ValidationError::InvalidDirectory {
        path: input.display().to_string(),
        reason,
    };

    let raw = input.as_os_str();
    if raw.is_empty() || input.to_string_lossy().trim().is_empty() {
        return Err(invalid("path is empty"));
    }
    if raw.as_encoded_bytes().contains(&0) {
        return Err(invalid("path contains a NUL byte"));
    }

    let resolved = std::path::absolute(input).map_err(|_| invalid("path cannot be resolved"))?;
    if resolved.exists() && !resolved.is_dir() {
        return Err(invalid("path exists and is not a directory"));
    }
    Ok(resolved)
}
