//! crates/logging/src/levels.rs
//! Severity levels accepted by the census logger.

use std::fmt;

use tracing::Level;

/// Severity attached to a census diagnostic.
///
/// The census core only distinguishes three severities: informational
/// notices, warnings for degraded entries, and errors for failed operations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    /// Informational notice.
    Info,
    /// Degraded entry or skipped subtree.
    Warning,
    /// Failed operation.
    Error,
}

impl Severity {
    /// Returns the lowercase label used in rendered diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Maps the severity onto the equivalent [`tracing::Level`].
    #[must_use]
    pub const fn tracing_level(self) -> Level {
        match self {
            Self::Info => Level::INFO,
            Self::Warning => Level::WARN,
            Self::Error => Level::ERROR,
        }
    }

    /// Maps a [`tracing::Level`] back onto a severity.
    ///
    /// `DEBUG` and `TRACE` have no census counterpart and return `None`.
    #[must_use]
    pub fn from_tracing_level(level: &Level) -> Option<Self> {
        match *level {
            Level::ERROR => Some(Self::Error),
            Level::WARN => Some(Self::Warning),
            Level::INFO => Some(Self::Info),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
