//! crates/logging/src/tracing_bridge.rs
//! Bridge between the tracing crate and the census logger.
//!
//! Two directions are covered:
//!
//! - [`init_tracing`] installs the process-wide subscriber that renders
//!   census events to stderr, filtered by [`VerbosityConfig`].
//! - [`LoggerLayer`] is a tracing-subscriber layer that replays INFO, WARN and
//!   ERROR events from census targets into any [`Logger`]. Hosts that already
//!   own a logger can observe events emitted through [`TracingLogger`] and the
//!   crate trace macros without a formatting subscriber.
//!
//! [`TracingLogger`]: crate::TracingLogger

use std::io;

use tracing::Subscriber;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use super::config::{CENSUS_TARGET, VerbosityConfig};
use super::levels::Severity;
use super::logger::Logger;

/// A tracing layer that forwards census events to a [`Logger`].
pub struct LoggerLayer<L> {
    logger: L,
}

impl<L: Logger> LoggerLayer<L> {
    /// Create a layer that forwards to `logger`.
    #[must_use]
    pub const fn new(logger: L) -> Self {
        Self { logger }
    }

    /// Reports whether `target` belongs to the census namespace.
    fn is_census_target(target: &str) -> bool {
        target == CENSUS_TARGET
            || target
                .strip_prefix(CENSUS_TARGET)
                .is_some_and(|rest| rest.starts_with("::"))
    }
}

impl<S, L> Layer<S> for LoggerLayer<L>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    L: Logger + 'static,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !Self::is_census_target(metadata.target()) {
            return;
        }
        let Some(severity) = Severity::from_tracing_level(metadata.level()) else {
            return;
        };

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        if let Some(message) = visitor.message {
            self.logger.log(severity, format_args!("{message}"));
        }
    }
}

/// Visitor to extract message from tracing event.
#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_owned());
        }
    }
}

/// Initialize tracing with census verbosity configuration.
///
/// Installs a formatting subscriber writing to stderr. Returns `false` when a
/// global subscriber was already installed, which makes repeated calls
/// harmless (tests and embedding hosts may initialise first).
///
/// # Example
///
/// ```rust,ignore
/// use logging::{VerbosityConfig, init_tracing};
///
/// init_tracing(VerbosityConfig::from_verbose_level(1));
/// tracing::info!(target: "census::walk", "scanning /etc");
/// ```
pub fn init_tracing(config: VerbosityConfig) -> bool {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .without_time();

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer)
        .try_init()
        .is_ok()
}
