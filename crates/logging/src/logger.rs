//! crates/logging/src/logger.rs
//! The leveled logger collaborator used by the census core.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use crate::levels::Severity;

/// Leveled logger handed to the census core.
///
/// Implementations must be cheap to call; the walker emits one message per
/// degraded or skipped entry.
pub trait Logger: Send + Sync {
    /// Records one formatted message at `severity`.
    fn log(&self, severity: Severity, message: fmt::Arguments<'_>);

    /// Records an informational notice.
    fn info(&self, message: fmt::Arguments<'_>) {
        self.log(Severity::Info, message);
    }

    /// Records a warning.
    fn warn(&self, message: fmt::Arguments<'_>) {
        self.log(Severity::Warning, message);
    }

    /// Records an error.
    fn error(&self, message: fmt::Arguments<'_>) {
        self.log(Severity::Error, message);
    }
}

impl<L: Logger + ?Sized> Logger for &L {
    fn log(&self, severity: Severity, message: fmt::Arguments<'_>) {
        (**self).log(severity, message);
    }
}

/// Logger that forwards every message to [`tracing`] under the `census::walk` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl TracingLogger {
    /// Creates the logger.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Logger for TracingLogger {
    fn log(&self, severity: Severity, message: fmt::Arguments<'_>) {
        match severity {
            Severity::Info => tracing::info!(target: "census::walk", "{message}"),
            Severity::Warning => tracing::warn!(target: "census::walk", "{message}"),
            Severity::Error => tracing::error!(target: "census::walk", "{message}"),
        }
    }
}

/// One message recorded by a [`CapturingLogger`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEvent {
    /// Severity the message was logged at.
    pub severity: Severity,
    /// Rendered message text.
    pub message: String,
}

/// Logger that keeps every message in memory.
///
/// Used by tests to assert on degraded-entry notices without installing a
/// global subscriber.
#[derive(Debug, Default)]
pub struct CapturingLogger {
    events: Mutex<Vec<LogEvent>>,
}

impl CapturingLogger {
    /// Creates an empty logger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<LogEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Removes and returns the recorded events.
    pub fn drain(&self) -> Vec<LogEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Counts recorded events at `severity`.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|event| event.severity == severity)
            .count()
    }

    /// Reports whether any message at `severity` contains `needle`.
    #[must_use]
    pub fn contains(&self, severity: Severity, needle: &str) -> bool {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|event| event.severity == severity && event.message.contains(needle))
    }
}

impl Logger for CapturingLogger {
    fn log(&self, severity: Severity, message: fmt::Arguments<'_>) {
        let event = LogEvent {
            severity,
            message: message.to_string(),
        };
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
