use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error returned when a census step fails.
///
/// Only [`WalkErrorKind::RootOpen`] and [`WalkErrorKind::InvalidDepth`] ever
/// escape a scan; the other kinds describe per-entry and per-directory
/// failures that the walker logs and skips.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct WalkError {
    kind: WalkErrorKind,
}

impl WalkError {
    pub(crate) fn new(kind: WalkErrorKind) -> Self {
        Self { kind }
    }

    pub(crate) fn invalid_depth(path: PathBuf) -> Self {
        Self::new(WalkErrorKind::InvalidDepth { path })
    }

    pub(crate) fn root_open(path: PathBuf, source: io::Error) -> Self {
        Self::new(WalkErrorKind::RootOpen { path, source })
    }

    pub(crate) fn read_dir(path: PathBuf, source: io::Error) -> Self {
        Self::new(WalkErrorKind::ReadDir { path, source })
    }

    pub(crate) fn read_dir_entry(path: PathBuf, source: io::Error) -> Self {
        Self::new(WalkErrorKind::ReadDirEntry { path, source })
    }

    pub(crate) fn metadata(path: PathBuf, source: io::Error) -> Self {
        Self::new(WalkErrorKind::Metadata { path, source })
    }

    pub(crate) fn current_dir(source: io::Error) -> Self {
        Self::new(WalkErrorKind::CurrentDir { source })
    }

    /// Returns the specific failure.
    #[must_use]
    pub fn kind(&self) -> &WalkErrorKind {
        &self.kind
    }

    /// Returns the filesystem path associated with the error.
    ///
    /// # Examples
    ///
    /// ```
    /// use label::SecurityLabelResolver;
    ///
    /// let labels = SecurityLabelResolver::unsupported();
    /// let error = walk::scan("/definitely/missing/census/root", 1, &labels)
    ///     .expect_err("missing root yields error");
    /// assert!(error.path().ends_with("root"));
    /// ```
    #[must_use]
    pub fn path(&self) -> &Path {
        self.kind.path()
    }

    /// Reports whether the error ends the whole scan.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self.kind,
            WalkErrorKind::RootOpen { .. }
                | WalkErrorKind::InvalidDepth { .. }
                | WalkErrorKind::CurrentDir { .. }
        )
    }
}

/// Classification of census failures.
#[derive(Debug, Error)]
pub enum WalkErrorKind {
    /// The requested depth was zero.
    #[error("scan depth for '{}' must be at least 1", path.display())]
    InvalidDepth {
        /// Root the request named.
        path: PathBuf,
    },
    /// The scan root could not be opened for listing.
    #[error("failed to open scan root '{}': {source}", path.display())]
    RootOpen {
        /// Root that failed to open.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        #[source]
        source: io::Error,
    },
    /// A directory below the root could not be opened.
    #[error("failed to read directory '{}': {source}", path.display())]
    ReadDir {
        /// Directory whose contents could not be read.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        #[source]
        source: io::Error,
    },
    /// Reading the next directory entry failed.
    #[error("failed to read entry in '{}': {source}", path.display())]
    ReadDirEntry {
        /// Directory containing the problematic entry.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        #[source]
        source: io::Error,
    },
    /// The non-following status call failed for an entry.
    #[error("failed to inspect metadata for '{}': {source}", path.display())]
    Metadata {
        /// Path whose metadata could not be retrieved.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        #[source]
        source: io::Error,
    },
    /// A relative root could not be made absolute.
    #[error("failed to determine the current directory: {source}")]
    CurrentDir {
        /// Underlying error emitted by the operating system.
        #[source]
        source: io::Error,
    },
}

impl WalkErrorKind {
    /// Returns the filesystem path tied to the failure.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::InvalidDepth { path }
            | Self::RootOpen { path, .. }
            | Self::ReadDir { path, .. }
            | Self::ReadDirEntry { path, .. }
            | Self::Metadata { path, .. } => path,
            Self::CurrentDir { .. } => Path::new("."),
        }
    }
}

/// Error returned by a [`RecordSink`](crate::RecordSink) that refused a record.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The sink rejected the record.
    #[error("record rejected: {0}")]
    Rejected(String),
    /// Writing the record failed.
    #[error("failed to write record: {0}")]
    Io(
        #[from]
        #[source]
        io::Error,
    ),
    /// An earlier failure closed the sink; the record was dropped unwritten.
    #[error("output closed by an earlier write failure")]
    Closed,
}
