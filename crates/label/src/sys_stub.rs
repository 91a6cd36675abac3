//! Label reader stub for targets without `lgetxattr`.
//!
//! The resolver built on these targets is permanently unsupported, so
//! [`XattrReader::read`] is never reached in practice.

use std::ffi::CStr;
use std::io;
use std::path::Path;

/// Placeholder for the platform reader; never constructed.
#[derive(Clone, Copy, Debug)]
pub(crate) struct XattrReader {
    _private: (),
}

impl XattrReader {
    /// Always reports the facility as absent.
    pub(crate) fn resolve() -> Option<Self> {
        logging::trace_label!("lgetxattr is not available on this target");
        None
    }

    pub(crate) fn read(
        &self,
        _path: &Path,
        _name: &CStr,
        _initial_capacity: usize,
    ) -> io::Result<Vec<u8>> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "security labels are not available on this platform",
        ))
    }
}
