//! Integration tests for routing census diagnostics through tracing.
//!
//! These tests install a scoped subscriber with [`LoggerLayer`] and verify
//! that messages emitted through [`TracingLogger`] and the crate trace macros
//! reach the capturing logger with the expected severity.

use logging::{CapturingLogger, LogEvent, Logger, LoggerLayer, Severity, TracingLogger};
use std::fmt;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;

#[derive(Clone, Default)]
struct Shared(Arc<CapturingLogger>);

impl Logger for Shared {
    fn log(&self, severity: Severity, message: fmt::Arguments<'_>) {
        self.0.log(severity, message);
    }
}

fn capture<F: FnOnce()>(body: F) -> Vec<LogEvent> {
    let shared = Shared::default();
    let subscriber = tracing_subscriber::registry().with(LoggerLayer::new(shared.clone()));
    tracing::subscriber::with_default(subscriber, body);
    shared.0.drain()
}

#[test]
fn warnings_keep_their_text() {
    let events = capture(|| {
        TracingLogger::new().warn(format_args!("cannot open directory {}", "/proc/1/fd"));
    });
    assert_eq!(
        events,
        vec![LogEvent {
            severity: Severity::Warning,
            message: "cannot open directory /proc/1/fd".to_owned(),
        }]
    );
}

#[test]
fn debug_trace_macros_are_not_forwarded() {
    let events = capture(|| {
        logging::trace_walk!("entering {}", "/etc");
        logging::trace_label!("probing");
        logging::trace_contents!("skipping {}", "/proc/kcore");
        logging::trace_inspect!("lstat ok");
    });
    assert!(events.is_empty());
}

#[test]
fn cli_trace_macro_is_forwarded_as_info() {
    let events = capture(|| {
        logging::trace_cli!("running {} jobs", 3);
    });
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].severity, Severity::Info);
    assert_eq!(events[0].message, "running 3 jobs");
}

#[test]
fn events_preserve_emission_order() {
    let events = capture(|| {
        let logger = TracingLogger::new();
        logger.error(format_args!("first"));
        logger.info(format_args!("second"));
        logger.warn(format_args!("third"));
    });
    let messages: Vec<&str> = events.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, ["first", "second", "third"]);
}
