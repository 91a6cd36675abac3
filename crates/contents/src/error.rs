use std::io;
use std::process::ExitStatus;

use thiserror::Error;
use walk::WalkError;

/// Errors produced while collecting file contents and properties.
#[derive(Debug, Error)]
pub enum ContentsError {
    /// A file selection pattern did not compile.
    #[error("failed to compile pattern '{pattern}': {source}")]
    Pattern {
        /// Offending pattern.
        pattern: String,
        /// Underlying compile error.
        #[source]
        source: globset::Error,
    },
    /// A property command could not be started.
    #[error("failed to run '{program}': {source}")]
    Spawn {
        /// Program that was run.
        program: String,
        /// Underlying spawn error.
        #[source]
        source: io::Error,
    },
    /// A property command exited unsuccessfully.
    #[error("'{program}' exited with {status}")]
    Status {
        /// Program that was run.
        program: String,
        /// Exit status it reported.
        status: ExitStatus,
    },
    /// The directory holding kernel parameters could not be listed.
    #[error(transparent)]
    Walk(#[from] WalkError),
}
