#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `walk` performs a bounded filesystem census: starting from a root
//! directory it lists every entry down to a depth limit and produces one
//! [`FileRecord`] per entry with ownership, size, mode, symlink target and
//! security label. The census is meant for attacker-controllable trees, so
//! it never follows symlinks, never recurses on the call stack and never
//! aborts because a single entry misbehaves.
//!
//! # Design
//!
//! - [`ScanRequest`] validates the root and depth limit of one census.
//! - [`DirectoryWalker`] drives traversal from an explicit stack of pending
//!   directories and hands every record to a [`RecordSink`].
//! - [`EntryInspector`] builds the record for a single path from the
//!   non-following status call, the link target and a
//!   [`label::LabelSource`].
//! - [`WalkError`] describes root, directory and per-entry failures with the
//!   offending path attached.
//!
//! # Invariants
//!
//! - Every record path is absolute and built by joining the parent with the
//!   child name; the filesystem root joined with `x` is `/x`.
//! - A record carries a link target exactly when its mode says symlink. A
//!   link that cannot be read carries [`LINK_READ_ERROR`].
//! - All children of a directory are emitted before any descendant of those
//!   children. Sibling order follows the filesystem and is unspecified.
//! - Sub-directories are opened with `O_NOFOLLOW`, so a directory replaced
//!   by a symlink between inspection and listing is skipped, not entered.
//! - Only an unopenable root fails a scan. Everything else is logged through
//!   the injected [`logging::Logger`] and counted in [`ScanSummary`].
//!
//! # Errors
//!
//! [`DirectoryWalker::scan`] returns [`WalkError`] when the root cannot be
//! listed. [`ScanRequest::new`] rejects a zero depth. Callers can downcast
//! to [`std::io::Error`] through [`std::error::Error::source`].
//!
//! # Examples
//!
//! Run a census with a capturing logger and inspect the summary.
//!
//! ```
//! use label::SecurityLabelResolver;
//! use logging::CapturingLogger;
//! use walk::{DirectoryWalker, FileRecord, ScanRequest};
//! use std::fs;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! fs::create_dir(temp.path().join("sub"))?;
//! fs::write(temp.path().join("sub/leaf.txt"), b"data")?;
//!
//! let labels = SecurityLabelResolver::unsupported();
//! let logger = CapturingLogger::new();
//! let request = ScanRequest::new(temp.path(), 2)?;
//! let mut records: Vec<FileRecord> = Vec::new();
//! let summary = DirectoryWalker::new(&labels, &logger).scan(&request, &mut records)?;
//!
//! assert_eq!(summary.records, 2);
//! assert!(summary.is_complete());
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```
//!
//! # See also
//!
//! - [`label::SecurityLabelResolver`] for the runtime-probed label facility.
//! - [`logging::TracingLogger`] for the logger used by [`scan`].

mod error;
mod inspect;
mod listing;
mod record;
mod request;
mod sink;
mod walker;


pub use crate::error::{SinkError, WalkError, WalkErrorKind};
pub use crate::inspect::EntryInspector;
pub use crate::record::{EntryKind, FileRecord, LINK_READ_ERROR, S_IFMT};
pub use crate::request::ScanRequest;
pub use crate::sink::{FnSink, RecordSink};
pub use crate::walker::{DirectoryWalker, ScanSummary, scan};
