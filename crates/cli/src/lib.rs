#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` implements the command-line front end of the `census` binary. It
//! turns `ROOT[:DEPTH]` operands, built-in plans and `--section` names into
//! scan jobs and sections, runs each job through [`walk::DirectoryWalker`],
//! streams the resulting records to standard output as JSON, JSON lines or
//! text, and then writes each section collected by [`contents`].
//!
//! # Design
//!
//! The crate exposes [`run`] as the primary entry point. The function accepts
//! an iterator of arguments together with handles for standard output and
//! error. A [`clap`](https://docs.rs/clap/) command definition collects the
//! raw values into [`ParsedArgs`]; [`CensusConfig::from_parsed`] validates
//! them. Records flow straight from the walker into a [`RecordWriter`], so
//! memory use is independent of the census size.
//!
//! # Invariants
//!
//! - `run` never panics; unexpected I/O failures surface as non-zero exit codes.
//! - Jobs run in order: plan roots first, then explicit roots. Sections are
//!   written after every job has run.
//! - A root that cannot be opened is reported on standard error and the
//!   remaining jobs still run. Once standard output fails, nothing else is
//!   scanned or written.
//!
//! # Errors
//!
//! Usage errors exit with [`EXIT_USAGE`]. A census in which at least one root
//! or section could not be collected exits with [`EXIT_PARTIAL`]. Failing to
//! write output exits with [`EXIT_USAGE`] as well, which outranks a partial
//! census when both happen.
//!
//! # Examples
//!
//! ```
//! use cli::run;
//!
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let exit_code = run(["census", "--version"], &mut stdout, &mut stderr);
//!
//! assert_eq!(exit_code, 0);
//! assert!(!stdout.is_empty());
//! assert!(stderr.is_empty());
//! ```
//!
//! # See also
//!
//! - [`walk`] for the traversal engine.
//! - [`contents`] for the section collectors.
//! - [`label::SecurityLabelResolver`] for label lookups.

use std::ffi::OsString;
use std::io::Write;

use label::{LabelConfig, LabelSource, SecurityLabelResolver};
use logging::{TracingLogger, trace_cli};
use walk::{DirectoryWalker, RecordSink, ScanRequest};

mod arguments;
mod config;
mod output;
mod plan;
mod sections;


pub use crate::arguments::{ParsedArgs, parse_args};
pub use crate::config::{CensusConfig, CliError, DEFAULT_DEPTH, LabelMode, OutputFormat, ScanJob};
pub use crate::output::{DOCUMENT_KEY, RecordWriter};
pub use crate::plan::{CensusPlan, UNBOUNDED_DEPTH};
pub use crate::sections::SectionKind;

/// Exit code when every root was scanned.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for usage errors and output failures.
pub const EXIT_USAGE: i32 = 1;

/// Exit code when at least one root or section could not be collected.
pub const EXIT_PARTIAL: i32 = 23;

/// Maximum exit code representable by a Unix process.
const MAX_EXIT_CODE: i32 = u8::MAX as i32;

/// Deterministic help text describing the CLI surface.
const HELP_TEXT: &str = concat!(
    "census ",
    env!("CARGO_PKG_VERSION"),
    "\n",
    "\n",
    "Usage: census [OPTIONS] [ROOT[:DEPTH]]...\n",
    "\n",
    "Lists every entry below each ROOT without following symlinks and prints\n",
    "one record per entry: path, type, link target, owner, group, size, mode\n",
    "and security label. Sections of collected values follow the records.\n",
    "\n",
    "Options:\n",
    "  -d, --depth N        Depth for roots given without ':DEPTH' (default 1000).\n",
    "      --plan NAME      Run a built-in plan first ('android', 'properties').\n",
    "      --section NAME   Collect a section: small_files, sysctl,\n",
    "                       environment_variables or system_properties.\n",
    "  -f, --format FORMAT  Output format: json, jsonl (default) or text.\n",
    "      --label-attr NAME  Extended attribute holding the security label.\n",
    "      --no-labels      Skip security label lookups entirely.\n",
    "  -v, --verbose        Increase log verbosity; may be repeated.\n",
    "  -q, --quiet          Only log warnings and errors.\n",
    "  -h, --help           Show this help message and exit.\n",
    "  -V, --version        Output version information and exit.\n",
    "\n",
    "Exit status is 0 when everything was collected, 1 on usage or output\n",
    "errors, and 23 when a root could not be opened or a section collected.\n",
);

/// Renders the help text.
fn render_help() -> String {
    HELP_TEXT.to_string()
}

/// Renders the version banner.
fn render_version() -> String {
    format!("census {}\n", env!("CARGO_PKG_VERSION"))
}

/// Runs the CLI using the provided argument iterator and output handles.
///
/// The function returns the process exit code that should be used by the caller.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    match parse_args(arguments) {
        Ok(parsed) => execute(parsed, stdout, stderr),
        Err(error) => {
            let _ = write!(stderr, "{error}");
            EXIT_USAGE
        }
    }
}

fn execute<Out, Err>(parsed: ParsedArgs, stdout: &mut Out, stderr: &mut Err) -> i32
where
    Out: Write,
    Err: Write,
{
    if parsed.show_help {
        return write_or_fail(stdout, &render_help());
    }
    if parsed.show_version {
        return write_or_fail(stdout, &render_version());
    }

    let config = match CensusConfig::from_parsed(parsed) {
        Ok(config) => config,
        Err(error) => {
            let _ = writeln!(stderr, "census: {error}");
            return EXIT_USAGE;
        }
    };

    logging::init_tracing(config.verbosity);
    run_census(&config, stdout, stderr)
}

fn write_or_fail<Out: Write>(stdout: &mut Out, text: &str) -> i32 {
    if stdout.write_all(text.as_bytes()).and_then(|()| stdout.flush()).is_ok() {
        EXIT_SUCCESS
    } else {
        EXIT_USAGE
    }
}

/// Runs every job and section of `config`, writing to `stdout`.
///
/// Root and section failures are reported on `stderr`; skipped entries are
/// logged through [`tracing`]. Returns the process exit code.
pub fn run_census<Out, Err>(config: &CensusConfig, stdout: &mut Out, stderr: &mut Err) -> i32
where
    Out: Write,
    Err: Write,
{
    let probed;
    let labels: &dyn LabelSource = match &config.labels {
        LabelMode::Disabled => {
            probed = SecurityLabelResolver::unsupported();
            &probed
        }
        LabelMode::Probe {
            config: label_config,
        } if *label_config == LabelConfig::default() => SecurityLabelResolver::shared(),
        LabelMode::Probe {
            config: label_config,
        } => {
            probed = SecurityLabelResolver::probe_with(label_config.clone());
            &probed
        }
    };

    let logger = TracingLogger::new();
    let walker = DirectoryWalker::new(labels, &logger);
    let mut writer = RecordWriter::new(&mut *stdout, config.format);
    let mut status = EXIT_SUCCESS;

    trace_cli!("running {} scan jobs", config.jobs.len());
    for job in &config.jobs {
        if writer.is_closed() {
            break;
        }
        let outcome = ScanRequest::new(job.root(), job.depth())
            .and_then(|request| walker.scan(&request, &mut writer));
        match outcome {
            Ok(summary) => {
                trace_cli!(
                    "{}: {} records, {} skipped entries, {} skipped directories",
                    job.root().display(),
                    summary.records,
                    summary.skipped_entries,
                    summary.skipped_directories
                );
                if summary.sink_failures > 0 {
                    let _ = writeln!(
                        stderr,
                        "census: failed to write {} records for '{}'",
                        summary.sink_failures,
                        job.root().display()
                    );
                    status = more_severe(status, EXIT_USAGE);
                }
            }
            Err(error) => {
                let _ = writeln!(stderr, "census: {error}");
                status = more_severe(status, EXIT_PARTIAL);
            }
        }
    }

    for &section in &config.sections {
        if writer.is_closed() {
            break;
        }
        trace_cli!("collecting {section}");
        let entries = match section.collect(&logger) {
            Ok(entries) => entries,
            Err(error) => {
                let _ = writeln!(stderr, "census: {section}: {error}");
                status = more_severe(status, EXIT_PARTIAL);
                continue;
            }
        };
        if let Err(error) = writer.write_section(section.key(), &entries) {
            let _ = writeln!(stderr, "census: failed to write {section}: {error}");
            status = more_severe(status, EXIT_USAGE);
        }
    }

    let already_failed = writer.is_closed();
    if let Err(error) = writer.finish() {
        if !already_failed {
            let _ = writeln!(stderr, "census: failed to write output: {error}");
        }
        status = more_severe(status, EXIT_USAGE);
    }
    status
}

/// Picks the exit code to report when two outcomes combine.
///
/// An output failure outranks a partial census, which outranks success.
fn more_severe(current: i32, candidate: i32) -> i32 {
    let rank = |code: i32| match code {
        EXIT_SUCCESS => 0,
        EXIT_PARTIAL => 1,
        _ => 2,
    };
    if rank(candidate) > rank(current) {
        candidate
    } else {
        current
    }
}

/// Converts a numeric exit code into an [`std::process::ExitCode`].
#[must_use]
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    let clamped = status.clamp(0, MAX_EXIT_CODE);
    std::process::ExitCode::from(clamped as u8)
}
