//! crates/logging/src/tracing_macros.rs
//! Convenience macros for census-specific tracing.
//!
//! These macros provide ergonomic wrappers around standard tracing macros
//! with appropriate targets for census subsystems. The emitting crate must
//! depend on `tracing` directly.

/// Emit a directory traversal trace.
///
/// # Example
/// ```ignore
/// trace_walk!("entering {} with depth {}", path.display(), depth);
/// ```
#[macro_export]
macro_rules! trace_walk {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "census::walk", $($arg)*);
    };
}

/// Emit a per-entry inspection trace.
///
/// # Example
/// ```ignore
/// trace_inspect!("mode={:o} for {}", mode, path.display());
/// ```
#[macro_export]
macro_rules! trace_inspect {
    ($($arg:tt)*) => {
        ::tracing::trace!(target: "census::inspect", $($arg)*);
    };
}

/// Emit a security label resolution trace.
///
/// # Example
/// ```ignore
/// trace_label!("resolved lgetxattr at {:p}", symbol);
/// ```
#[macro_export]
macro_rules! trace_label {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "census::label", $($arg)*);
    };
}

/// Emit a command-line front-end trace.
///
/// # Example
/// ```ignore
/// trace_cli!("running {} scan jobs", jobs.len());
/// ```
#[macro_export]
macro_rules! trace_cli {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "census::cli", $($arg)*);
    };
}

/// Emit a file contents or kernel parameter collection trace.
///
/// # Example
/// ```ignore
/// trace_contents!("skipping {}: {}", path.display(), error);
/// ```
#[macro_export]
macro_rules! trace_contents {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "census::contents", $($arg)*);
    };
}
