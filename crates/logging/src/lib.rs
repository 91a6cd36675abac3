#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` provides the leveled logger collaborator used throughout the
//! census workspace. The traversal core never formats or transports log lines
//! itself; it hands messages to a [`Logger`] at one of three [`Severity`]
//! levels and moves on.
//!
//! # Design
//!
//! - [`Logger`] is the seam the core depends on. It takes pre-formatted
//!   [`std::fmt::Arguments`] so callers never allocate when the message is
//!   discarded.
//! - [`TracingLogger`] routes messages to [`tracing`] under the `census::walk`
//!   target; [`init_tracing`] installs the stderr subscriber filtered by a
//!   [`VerbosityConfig`].
//! - [`CapturingLogger`] keeps messages in memory so tests can assert on
//!   degraded-entry notices; [`LoggerLayer`] replays tracing events from
//!   census targets into any logger.
//! - The `trace_*` macros emit debug-level traces with per-subsystem targets.
//!
//! # Invariants
//!
//! - Logging never fails and never panics; a poisoned capture buffer is
//!   recovered rather than propagated.
//! - Only targets under `census` are forwarded by [`LoggerLayer`].
//!
//! # Examples
//!
//! ```
//! use logging::{CapturingLogger, Logger, Severity};
//!
//! let logger = CapturingLogger::new();
//! logger.warn(format_args!("failed to read link {}", "/dev/stdin"));
//! assert_eq!(logger.count(Severity::Warning), 1);
//! ```

mod config;
mod levels;
mod logger;
mod tracing_bridge;
mod tracing_macros;

pub use config::{CENSUS_TARGET, MAX_VERBOSE_LEVEL, VerbosityConfig};
pub use levels::Severity;
pub use logger::{CapturingLogger, LogEvent, Logger, TracingLogger};
pub use tracing_bridge::{LoggerLayer, init_tracing};
