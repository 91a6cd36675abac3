#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `label` reads mandatory-access-control labels (for example SELinux
//! contexts stored in the `security.selinux` extended attribute) for
//! filesystem entries. The facility is optional: the C library may not export
//! `lgetxattr`, the target may not be Linux, or the entry may carry no label.
//! Every one of those outcomes is reported as "no label", never as an error.
//!
//! # Design
//!
//! - [`LabelSource`] is the seam the entry inspector depends on. It exposes a
//!   platform [`LabelCapability`] query separately from the per-entry
//!   [`LabelSource::lookup`].
//! - [`SecurityLabelResolver`] locates `lgetxattr` at runtime via `dlsym`
//!   once, at construction, and degrades permanently to unsupported when the
//!   symbol is missing. [`SecurityLabelResolver::shared`] wraps a single
//!   instance in a [`std::sync::OnceLock`] for hosts that want process-wide
//!   state.
//! - [`FixedLabel`] is a deterministic stand-in for tests.
//!
//! # Invariants
//!
//! - Lookups never follow symlinks.
//! - At most three `lgetxattr` calls happen per lookup: the first read, a
//!   size query after `ERANGE`, and one retry with a buffer of exactly that
//!   size.
//! - Returned labels are owned by the caller and never empty.
//!
//! # Examples
//!
//! ```
//! use label::{LabelSource, SecurityLabelResolver};
//! use std::path::Path;
//!
//! let resolver = SecurityLabelResolver::unsupported();
//! assert!(!resolver.capability().is_supported());
//! assert!(resolver.lookup(Path::new("/")).is_none());
//! ```

mod config;
mod resolver;
mod source;

#[cfg(any(target_os = "linux", target_os = "android"))]
mod sys;

#[cfg(not(any(target_os = "linux", target_os = "android")))]
#[path = "sys_stub.rs"]
mod sys;

pub use config::{DEFAULT_INITIAL_CAPACITY, LabelConfig, LabelConfigError, SELINUX_ATTRIBUTE};
pub use resolver::SecurityLabelResolver;
pub use source::{FixedLabel, LabelCapability, LabelSource};
