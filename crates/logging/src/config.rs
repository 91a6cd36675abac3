//! crates/logging/src/config.rs
//! Verbosity configuration mapping `-v` counts to tracing filters.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Target prefix shared by every census tracing event.
pub const CENSUS_TARGET: &str = "census";

/// Highest `-v` count with a distinct meaning.
pub const MAX_VERBOSE_LEVEL: u8 = 3;

/// Verbosity configuration for census diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerbosityConfig {
    /// Number of `-v` flags, clamped to [`MAX_VERBOSE_LEVEL`].
    pub verbose: u8,
    /// Suppress informational notices entirely.
    pub quiet: bool,
}

impl Default for VerbosityConfig {
    fn default() -> Self {
        Self {
            verbose: 0,
            quiet: false,
        }
    }
}

impl VerbosityConfig {
    /// Create a configuration from a verbose level.
    ///
    /// - `0`: warnings and errors
    /// - `1`: plus informational notices
    /// - `2`: plus per-directory debug traces
    /// - `3` and above: plus per-entry traces
    #[must_use]
    pub fn from_verbose_level(level: u8) -> Self {
        Self {
            verbose: level.min(MAX_VERBOSE_LEVEL),
            quiet: false,
        }
    }

    /// Returns a copy that drops everything below warnings.
    #[must_use]
    pub const fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    /// Maximum level recorded for census targets.
    #[must_use]
    pub const fn level_filter(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::WARN;
        }
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    /// Directive string understood by [`EnvFilter`].
    #[must_use]
    pub fn directive(&self) -> String {
        format!("{CENSUS_TARGET}={}", self.level_filter())
    }

    /// Builds the filter for the subscriber.
    ///
    /// `RUST_LOG` takes precedence when set; otherwise only census targets are
    /// enabled at the configured level.
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directive()))
    }
}
