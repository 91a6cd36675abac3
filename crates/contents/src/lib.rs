#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `contents` collects the parts of a device census that are values rather
//! than metadata: copies of small configuration and kernel files, kernel
//! parameters below `/proc/sys`, the process environment and Android system
//! properties. Every collector returns a [`Section`], a sorted map from key
//! to value that the front end writes next to the file records.
//!
//! # Design
//!
//! - [`FileSelection`] names the files to copy as fixed paths, glob
//!   patterns below a base directory, and per-process files. Patterns are
//!   evaluated with [`walk::DirectoryWalker`], so they share its
//!   non-following traversal.
//! - [`read_small_file`] reads in fixed chunks until end of file, because
//!   pseudo-files report a size of zero.
//! - [`collect_small_files`] base64-encodes each copied file.
//! - [`collect_sysctl`], [`environment_variables`] and
//!   [`system_properties`] build the remaining sections.
//!
//! # Errors
//!
//! Per-file failures never fail a collector; they are traced or logged and
//! the file is left out. [`ContentsError`] covers bad patterns, a property
//! command that cannot run, and a kernel parameter root that cannot be
//! listed.
//!
//! # Examples
//!
//! ```
//! use contents::{FileSelection, MAX_SMALL_FILE_BYTES, collect_small_files};
//! use logging::CapturingLogger;
//! use std::fs;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! fs::write(temp.path().join("init.rc"), b"on boot\n")?;
//!
//! let selection = FileSelection::new().pattern(temp.path(), "init*.rc")?;
//! let files = collect_small_files(&selection, MAX_SMALL_FILE_BYTES, &CapturingLogger::new());
//!
//! let key = temp.path().join("init.rc").to_string_lossy().into_owned();
//! assert_eq!(files[&key], "b24gYm9vdAo=");
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

use std::collections::BTreeMap;

mod error;
mod properties;
mod read;
mod selection;
mod small_files;
mod sysctl;

pub use crate::error::ContentsError;
pub use crate::properties::{GETPROP, environment_variables, parse_properties, system_properties};
pub use crate::read::{MAX_SMALL_FILE_BYTES, READ_CHUNK, read_small_file};
pub use crate::selection::{DEEP_PATTERN_DEPTH, FileSelection};
pub use crate::small_files::collect_small_files;
pub use crate::sysctl::{SYSCTL_ROOT, collect_sysctl, sysctl_name};

/// Key-sorted values of one census section.
pub type Section = BTreeMap<String, String>;
