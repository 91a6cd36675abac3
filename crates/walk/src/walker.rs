use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use label::LabelSource;
use logging::{Logger, TracingLogger, trace_walk};

use crate::error::WalkError;
use crate::inspect::EntryInspector;
use crate::listing::{self, Follow};
use crate::record::{EntryKind, FileRecord};
use crate::request::ScanRequest;
use crate::sink::RecordSink;

/// Counters describing how complete a finished scan is.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ScanSummary {
    /// Records accepted by the sink.
    pub records: u64,
    /// Entries dropped because their status or directory entry could not be read.
    pub skipped_entries: u64,
    /// Sub-directories whose contents could not be listed.
    pub skipped_directories: u64,
    /// Symlink records carrying the read-error sentinel.
    pub degraded_links: u64,
    /// Records the sink refused.
    pub sink_failures: u64,
}

impl ScanSummary {
    /// Reports whether nothing was skipped, degraded or refused.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.skipped_entries == 0
            && self.skipped_directories == 0
            && self.degraded_links == 0
            && self.sink_failures == 0
    }
}

/// Bounded, non-following directory census.
///
/// Traversal is driven by an explicit stack of pending directories, so the
/// depth limit never translates into call-stack depth. Every child of a
/// directory is inspected and handed to the sink before any of its own
/// sub-directories are listed. Symlinks are recorded but never descended
/// into, which also makes symlink cycles harmless.
pub struct DirectoryWalker<'a> {
    labels: &'a dyn LabelSource,
    logger: &'a dyn Logger,
}

impl<'a> DirectoryWalker<'a> {
    /// Creates a walker that labels entries from `labels` and reports
    /// skipped entries to `logger`.
    #[must_use]
    pub fn new(labels: &'a dyn LabelSource, logger: &'a dyn Logger) -> Self {
        Self { labels, logger }
    }

    /// Runs the census described by `request`, appending records to `sink`.
    ///
    /// # Errors
    ///
    /// Only a root that cannot be opened for listing fails the scan. Every
    /// other failure is logged, counted in the returned [`ScanSummary`], and
    /// skipped. A sink that reports itself closed ends the scan early with an
    /// incomplete summary.
    pub fn scan(
        &self,
        request: &ScanRequest,
        sink: &mut dyn RecordSink,
    ) -> Result<ScanSummary, WalkError> {
        trace_walk!(
            "scanning {} to depth {}",
            request.root().display(),
            request.depth()
        );
        let mut stack = vec![PendingDirectory::root(
            request.root().to_path_buf(),
            request.depth(),
        )];
        let summary = self.drain(&mut stack, sink)?;
        trace_walk!(
            "finished {}: {} records, {} skipped entries, {} skipped directories",
            request.root().display(),
            summary.records,
            summary.skipped_entries,
            summary.skipped_directories
        );
        Ok(summary)
    }

    pub(crate) fn drain(
        &self,
        stack: &mut Vec<PendingDirectory>,
        sink: &mut dyn RecordSink,
    ) -> Result<ScanSummary, WalkError> {
        let inspector = EntryInspector::new(self.labels, self.logger);
        let mut summary = ScanSummary::default();

        while let Some(directory) = stack.pop() {
            let follow = if directory.is_root {
                Follow::Root
            } else {
                Follow::Never
            };
            let entries = match listing::open(&directory.path, follow) {
                Ok(entries) => entries,
                Err(error) if directory.is_root => {
                    return Err(WalkError::root_open(directory.path, error));
                }
                Err(error) => {
                    let error = WalkError::read_dir(directory.path, error);
                    self.logger.warn(format_args!("{error}"));
                    summary.skipped_directories += 1;
                    continue;
                }
            };
            trace_walk!(
                "listing {} ({} levels left)",
                directory.path.display(),
                directory.remaining
            );

            let mut subdirectories = Vec::new();
            for entry in entries {
                let name = match entry {
                    Ok(name) => name,
                    Err(error) => {
                        let error = WalkError::read_dir_entry(directory.path.clone(), error);
                        self.logger.warn(format_args!("{error}"));
                        summary.skipped_entries += 1;
                        continue;
                    }
                };

                let child = join_child(&directory.path, &name);
                let record = match inspector.inspect(&child) {
                    Ok(record) => record,
                    Err(error) => {
                        self.logger.warn(format_args!("{error}"));
                        summary.skipped_entries += 1;
                        continue;
                    }
                };

                if record.link_target_degraded() {
                    summary.degraded_links += 1;
                }
                let descend = directory.remaining > 1 && record.kind() == EntryKind::Directory;

                match sink.append(record) {
                    Ok(()) => summary.records += 1,
                    Err(error) => {
                        summary.sink_failures += 1;
                        if sink.is_closed() {
                            self.logger.error(format_args!(
                                "failed to append record for '{}': {}; output closed, stopping",
                                child.display(),
                                error
                            ));
                            stack.clear();
                            return Ok(summary);
                        }
                        self.logger.error(format_args!(
                            "failed to append record for '{}': {}",
                            child.display(),
                            error
                        ));
                    }
                }

                if descend {
                    subdirectories.push(PendingDirectory::nested(child, directory.remaining - 1));
                }
            }

            // Reversed so the first listed sub-directory is popped first.
            stack.extend(subdirectories.into_iter().rev());
        }

        Ok(summary)
    }
}

/// Directory waiting to be listed.
#[derive(Clone, Debug)]
pub(crate) struct PendingDirectory {
    pub(crate) path: PathBuf,
    pub(crate) remaining: u32,
    pub(crate) is_root: bool,
}

impl PendingDirectory {
    pub(crate) const fn root(path: PathBuf, remaining: u32) -> Self {
        Self {
            path,
            remaining,
            is_root: true,
        }
    }

    pub(crate) const fn nested(path: PathBuf, remaining: u32) -> Self {
        Self {
            path,
            remaining,
            is_root: false,
        }
    }
}

/// Appends `name` to `parent` with exactly one separator between them.
pub(crate) fn join_child(parent: &Path, name: &OsStr) -> PathBuf {
    let parent = parent.as_os_str();
    let mut joined = OsString::with_capacity(parent.len() + name.len() + 1);
    joined.push(parent);
    if !ends_with_separator(parent) {
        joined.push(std::path::MAIN_SEPARATOR_STR);
    }
    joined.push(name);
    PathBuf::from(joined)
}

#[cfg(unix)]
fn ends_with_separator(path: &OsStr) -> bool {
    use std::os::unix::ffi::OsStrExt;
    path.as_bytes().last() == Some(&b'/')
}

#[cfg(not(unix))]
fn ends_with_separator(path: &OsStr) -> bool {
    path.to_string_lossy().ends_with(std::path::is_separator)
}

/// Scans `root` to `depth` levels and collects every record.
///
/// Skipped entries are reported through [`tracing`] under the
/// `census::walk` target.
///
/// # Errors
///
/// Fails when `depth` is zero, when a relative `root` cannot be resolved, or
/// when `root` cannot be opened for listing.
///
/// # Examples
///
/// ```
/// use label::SecurityLabelResolver;
/// use std::fs;
///
/// # fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let temp = tempfile::tempdir()?;
/// fs::write(temp.path().join("a.txt"), b"hello")?;
///
/// let records = walk::scan(temp.path(), 1, &SecurityLabelResolver::unsupported())?;
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].size(), 5);
/// # Ok(())
/// # }
/// # demo().unwrap();
/// ```
pub fn scan<P: Into<PathBuf>>(
    root: P,
    depth: u32,
    labels: &dyn LabelSource,
) -> Result<Vec<FileRecord>, WalkError> {
    let request = ScanRequest::new(root, depth)?;
    let logger = TracingLogger::new();
    let mut records: Vec<FileRecord> = Vec::new();
    DirectoryWalker::new(labels, &logger).scan(&request, &mut records)?;
    Ok(records)
}
