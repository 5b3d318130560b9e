//! Manifest types produced by the scrape phase.
//!
//! A [`FolderPath`] names a remote directory relative to the root, and a
//! [`FileEntry`] names one remote file inside such a directory. Both are used
//! twice: once to build the remote URL and once to build the mirrored local
//! path, so the remote and local trees always have the same shape.

use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

/// Ordered path segments of a remote directory relative to the root.
///
/// The root is the empty sequence. Segments never carry a trailing separator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FolderPath {
    segments: Vec<String>,
}

impl FolderPath {
    /// Returns the root path (no segments).
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns the child path formed by appending `name`.
    #[must_use]
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self { segments }
    }

    /// Returns the path segments in order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the nesting depth (0 for the root).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Returns true for the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the listing URL for this folder under `root`.
    ///
    /// Segments are percent-encoded and the result always ends with `/`.
    #[must_use]
    pub fn listing_url(&self, root: &Url) -> Url {
        let mut url = root.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(&self.segments);
            path.push("");
        }
        url
    }

    /// Returns the local directory for this folder under `base_dir`.
    #[must_use]
    pub fn local_dir(&self, base_dir: &Path) -> PathBuf {
        let mut dir = base_dir.to_path_buf();
        dir.extend(&self.segments);
        dir
    }
}

impl<S: Into<String>> FromIterator<S> for FolderPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for FolderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}

/// One remote file discovered during the scrape.
///
/// Uniquely identified by `parent + name` within a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileEntry {
    name: String,
    parent: FolderPath,
}

impl FileEntry {
    /// Creates an entry for `name` inside `parent`.
    #[must_use]
    pub fn new(name: impl Into<String>, parent: FolderPath) -> Self {
        Self {
            name: name.into(),
            parent,
        }
    }

    /// Returns the file name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the containing folder.
    #[must_use]
    pub fn parent(&self) -> &FolderPath {
        &self.parent
    }

    /// Returns the download URL for this file under `root`.
    #[must_use]
    pub fn remote_url(&self, root: &Url) -> Url {
        let mut url = root.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(self.parent.segments());
            path.push(&self.name);
        }
        url
    }

    /// Returns the mirrored local path for this file under `base_dir`.
    #[must_use]
    pub fn local_path(&self, base_dir: &Path) -> PathBuf {
        self.parent.local_dir(base_dir).join(&self.name)
    }
}

impl fmt::Display for FileEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.parent.is_root() {
            write!(f, "/{}", self.name)
        } else {
            write!(f, "{}/{}", self.parent, self.name)
        }
    }
}

/// Result of a complete scrape: every folder and every file, in pre-order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    /// Discovered folders, excluding the root.
    pub folders: Vec<FolderPath>,
    /// Discovered files.
    pub files: Vec<FileEntry>,
}

impl Manifest {
    /// Returns the number of files in the manifest.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true when the scrape found no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
