use std::fs;
use std::path::Path;

use label::LabelSource;
use logging::{Logger, trace_inspect};

use crate::error::WalkError;
use crate::record::FileRecord;

/// Produces the [`FileRecord`] for a single path.
///
/// The inspector never follows symlinks. A symlink whose target cannot be
/// read still yields a record, with the target set to
/// [`LINK_READ_ERROR`](crate::LINK_READ_ERROR); a missing label is simply
/// absent. Only a failing status call is reported as an error.
pub struct EntryInspector<'a> {
    labels: &'a dyn LabelSource,
    logger: &'a dyn Logger,
}

impl<'a> EntryInspector<'a> {
    /// Creates an inspector reading labels from `labels`.
    #[must_use]
    pub fn new(labels: &'a dyn LabelSource, logger: &'a dyn Logger) -> Self {
        Self { labels, logger }
    }

    /// Inspects `path` without following it.
    pub fn inspect(&self, path: &Path) -> Result<FileRecord, WalkError> {
        let metadata = fs::symlink_metadata(path)
            .map_err(|error| WalkError::metadata(path.to_path_buf(), error))?;

        let link_target = if metadata.file_type().is_symlink() {
            Some(self.read_link_target(path))
        } else {
            None
        };

        let security_label = self.labels.lookup(path);
        let record = FileRecord::from_metadata(path, &metadata, link_target, security_label);
        trace_inspect!("{}", record);
        Ok(record)
    }

    /// Returns the raw link target, or the sentinel when it cannot be read.
    fn read_link_target(&self, path: &Path) -> Vec<u8> {
        match fs::read_link(path) {
            Ok(target) => target_bytes(&target),
            Err(error) => {
                self.logger.warn(format_args!(
                    "failed to read symlink '{}': {}",
                    path.display(),
                    error
                ));
                crate::record::LINK_READ_ERROR.to_vec()
            }
        }
    }
}

#[cfg(unix)]
fn target_bytes(target: &Path) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    target.as_os_str().as_bytes().to_vec()
}

#[cfg(not(unix))]
fn target_bytes(target: &Path) -> Vec<u8> {
    target.to_string_lossy().into_owned().into_bytes()
}
