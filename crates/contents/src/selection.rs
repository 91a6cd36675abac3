use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use globset::{GlobBuilder, GlobMatcher};
use label::SecurityLabelResolver;
use logging::{Logger, trace_contents};
use walk::{DirectoryWalker, EntryKind, FileRecord, FnSink, ScanRequest};

use crate::error::ContentsError;

/// Depth used for patterns containing `**`.
pub const DEEP_PATTERN_DEPTH: u32 = 1000;

/// Set of files whose contents a census copies.
///
/// A selection combines fixed paths, glob patterns evaluated below a base
/// directory, and per-process files found under a `/proc`-style directory.
/// [`FileSelection::expand`] resolves it into concrete paths; patterns only
/// ever match regular files and are evaluated without following symlinks.
#[derive(Clone, Debug, Default)]
pub struct FileSelection {
    paths: Vec<PathBuf>,
    patterns: Vec<PatternRule>,
    processes: Vec<ProcessFiles>,
}

#[derive(Clone, Debug)]
struct PatternRule {
    base: PathBuf,
    include: GlobMatcher,
    exclude: Option<GlobMatcher>,
    depth: u32,
}

#[derive(Clone, Debug)]
struct ProcessFiles {
    proc_root: PathBuf,
    names: Vec<PathBuf>,
}

impl FileSelection {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fixed path.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    /// Adds every regular file below `base` whose relative path matches
    /// `pattern`.
    ///
    /// `*` never crosses a `/`; `**` spans any number of directories.
    pub fn pattern(
        self,
        base: impl Into<PathBuf>,
        pattern: &str,
    ) -> Result<Self, ContentsError> {
        self.push_pattern(base.into(), pattern, None)
    }

    /// Like [`FileSelection::pattern`], minus paths matching `exclude`.
    pub fn pattern_excluding(
        self,
        base: impl Into<PathBuf>,
        pattern: &str,
        exclude: &str,
    ) -> Result<Self, ContentsError> {
        self.push_pattern(base.into(), pattern, Some(exclude))
    }

    /// Adds `proc_root/<pid>/<name>` for every numeric entry of `proc_root`
    /// and every name in `names`.
    pub fn per_process<I, P>(mut self, proc_root: impl Into<PathBuf>, names: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.processes.push(ProcessFiles {
            proc_root: proc_root.into(),
            names: names.into_iter().map(Into::into).collect(),
        });
        self
    }

    fn push_pattern(
        mut self,
        base: PathBuf,
        pattern: &str,
        exclude: Option<&str>,
    ) -> Result<Self, ContentsError> {
        let depth = if pattern.contains("**") {
            DEEP_PATTERN_DEPTH
        } else {
            pattern_depth(pattern)
        };
        self.patterns.push(PatternRule {
            base,
            include: compile(pattern)?,
            exclude: exclude.map(compile).transpose()?,
            depth,
        });
        Ok(self)
    }

    /// Resolves the selection into concrete paths.
    ///
    /// Fixed paths come first, then pattern matches, then per-process files.
    /// Duplicates keep their first position. Nothing is checked for
    /// existence beyond what pattern evaluation needs; unreadable bases are
    /// traced and contribute nothing.
    pub fn expand(&self, logger: &dyn Logger) -> Vec<PathBuf> {
        let mut seen = BTreeSet::new();
        let mut expanded = Vec::new();
        let mut keep = |path: PathBuf| {
            if seen.insert(path.clone()) {
                expanded.push(path);
            }
        };

        for path in &self.paths {
            keep(path.clone());
        }
        for rule in &self.patterns {
            for path in rule.matches(logger) {
                keep(path);
            }
        }
        for processes in &self.processes {
            for path in processes.files() {
                keep(path);
            }
        }
        expanded
    }
}

impl PatternRule {
    fn matches(&self, logger: &dyn Logger) -> Vec<PathBuf> {
        let request = match ScanRequest::new(&self.base, self.depth) {
            Ok(request) => request,
            Err(error) => {
                trace_contents!("pattern base {} unusable: {}", self.base.display(), error);
                return Vec::new();
            }
        };

        let labels = SecurityLabelResolver::unsupported();
        let mut found = Vec::new();
        let mut sink = FnSink::new(|record: FileRecord| {
            if record.kind() != EntryKind::Regular {
                return Ok(());
            }
            let path = record.path_buf();
            if let Ok(relative) = path.strip_prefix(request.root()) {
                let excluded = self
                    .exclude
                    .as_ref()
                    .is_some_and(|exclude| exclude.is_match(relative));
                if self.include.is_match(relative) && !excluded {
                    found.push(path);
                }
            }
            Ok(())
        });

        if let Err(error) = DirectoryWalker::new(&labels, logger).scan(&request, &mut sink) {
            trace_contents!("pattern base {} unreadable: {}", self.base.display(), error);
        }
        drop(sink);
        found
    }
}

impl ProcessFiles {
    fn files(&self) -> Vec<PathBuf> {
        let entries = match fs::read_dir(&self.proc_root) {
            Ok(entries) => entries,
            Err(error) => {
                trace_contents!("cannot list {}: {}", self.proc_root.display(), error);
                return Vec::new();
            }
        };

        let mut pids: Vec<(u64, OsString)> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name();
                let pid = name
                    .to_str()
                    .filter(|text| !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()))
                    .and_then(|text| text.parse::<u64>().ok())?;
                Some((pid, name))
            })
            .collect();
        pids.sort();

        let mut files = Vec::with_capacity(pids.len() * self.names.len());
        for (_, pid) in &pids {
            let process = self.proc_root.join(pid);
            for name in &self.names {
                files.push(process.join(name));
            }
        }
        files
    }
}

fn compile(pattern: &str) -> Result<GlobMatcher, ContentsError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .backslash_escape(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| ContentsError::Pattern {
            pattern: pattern.to_owned(),
            source,
        })
}

/// Number of directory levels a pattern without `**` can reach.
fn pattern_depth(pattern: &str) -> u32 {
    let separators = pattern.bytes().filter(|&byte| byte == b'/').count();
    u32::try_from(separators).map_or(DEEP_PATTERN_DEPTH, |count| count.saturating_add(1))
}
