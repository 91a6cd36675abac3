use std::io;
use std::path::{Component, Path, PathBuf};

use label::SecurityLabelResolver;
use logging::{Logger, trace_contents};
use walk::{DirectoryWalker, EntryKind, FileRecord, FnSink, ScanRequest};

use crate::Section;
use crate::error::ContentsError;
use crate::read::{MAX_SMALL_FILE_BYTES, read_small_file};

/// Directory exposing kernel parameters on Linux.
pub const SYSCTL_ROOT: &str = "/proc/sys";

/// Levels listed below [`SYSCTL_ROOT`].
const SYSCTL_DEPTH: u32 = 1000;

/// Reads every kernel parameter below `root`, keyed by its dotted name.
///
/// `root/kernel/hostname` is reported as `kernel.hostname`. Values are
/// decoded lossily as UTF-8 and lose one trailing newline. Write-only
/// parameters are skipped silently; other read failures are logged as
/// warnings and skipped.
///
/// # Errors
///
/// Fails only when `root` itself cannot be listed.
pub fn collect_sysctl(root: &Path, logger: &dyn Logger) -> Result<Section, ContentsError> {
    let request = ScanRequest::new(root, SYSCTL_DEPTH)?;
    let labels = SecurityLabelResolver::unsupported();
    let mut files: Vec<PathBuf> = Vec::new();
    let mut sink = FnSink::new(|record: FileRecord| {
        if record.kind() == EntryKind::Regular {
            files.push(record.path_buf());
        }
        Ok(())
    });
    DirectoryWalker::new(&labels, logger).scan(&request, &mut sink)?;
    drop(sink);

    let mut parameters = Section::new();
    for path in files {
        let Some(name) = sysctl_name(request.root(), &path) else {
            continue;
        };
        match read_small_file(&path, MAX_SMALL_FILE_BYTES) {
            Ok(contents) => {
                let mut value = String::from_utf8_lossy(&contents).into_owned();
                if value.ends_with('\n') {
                    value.pop();
                }
                parameters.insert(name, value);
            }
            Err(error) if error.kind() == io::ErrorKind::PermissionDenied => {
                trace_contents!("{} is not readable", path.display());
            }
            Err(error) => {
                logger.warn(format_args!("failed to read {}: {}", path.display(), error));
            }
        }
    }
    Ok(parameters)
}

/// Dotted parameter name of `path` below `root`.
///
/// Returns `None` when `path` is not below `root`.
pub fn sysctl_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("."))
    }
}
