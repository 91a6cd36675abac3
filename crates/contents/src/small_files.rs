use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use logging::{Logger, trace_contents};

use crate::read::read_small_file;
use crate::selection::FileSelection;
use crate::Section;

/// Copies every readable file of `selection`, base64-encoded and keyed by
/// path.
///
/// Files that are missing, unreadable, not regular or larger than `limit`
/// bytes are left out; each omission is traced at debug level only, since
/// most selections name files that exist on some devices and not others.
pub fn collect_small_files(selection: &FileSelection, limit: u64, logger: &dyn Logger) -> Section {
    let mut files = Section::new();
    for path in selection.expand(logger) {
        match read_small_file(&path, limit) {
            Ok(contents) => {
                files.insert(path_key(&path), STANDARD.encode(contents));
            }
            Err(error) => trace_contents!("skipping {}: {}", path.display(), error),
        }
    }
    files
}

fn path_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
