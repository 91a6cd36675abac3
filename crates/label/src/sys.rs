//! Runtime-resolved `lgetxattr` access for Linux and Android.
//!
//! Some C libraries implement the extended attribute syscalls without
//! exposing them in the headers or import libraries the binary was linked
//! against, so the symbol is looked up in the global scope at runtime instead
//! of being bound at link time. A missing symbol is not an error; the caller
//! degrades to "no label".

#![allow(unsafe_code)]

use std::ffi::{CStr, CString, c_char, c_void};
use std::fmt;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::ptr;

use logging::trace_label;

type LgetxattrFn =
    unsafe extern "C" fn(*const c_char, *const c_char, *mut c_void, libc::size_t) -> libc::ssize_t;

const LGETXATTR_SYMBOL: &CStr = c"lgetxattr";

/// Handle to the platform `lgetxattr` function.
#[derive(Clone, Copy)]
pub(crate) struct XattrReader {
    lgetxattr: LgetxattrFn,
}

impl fmt::Debug for XattrReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XattrReader")
            .field("lgetxattr", &(self.lgetxattr as *const c_void))
            .finish()
    }
}

impl XattrReader {
    /// Looks up `lgetxattr` in the process's global symbol scope.
    pub(crate) fn resolve() -> Option<Self> {
        // SAFETY: RTLD_DEFAULT is a valid pseudo-handle and the symbol name is
        // NUL-terminated. dlsym does not retain the name pointer.
        let symbol = unsafe { libc::dlsym(libc::RTLD_DEFAULT, LGETXATTR_SYMBOL.as_ptr()) };
        if symbol.is_null() {
            trace_label!("dlsym could not find {:?}", LGETXATTR_SYMBOL);
            return None;
        }

        trace_label!("resolved {:?} at {:p}", LGETXATTR_SYMBOL, symbol);
        // SAFETY: every C library exporting `lgetxattr` gives it this
        // signature, and symbols from RTLD_DEFAULT stay mapped for the
        // lifetime of the process.
        let lgetxattr = unsafe { std::mem::transmute::<*mut c_void, LgetxattrFn>(symbol) };
        Some(Self { lgetxattr })
    }

    /// Single `lgetxattr` call. An empty `buffer` performs a size query.
    fn call(&self, path: &CStr, name: &CStr, buffer: &mut [u8]) -> io::Result<usize> {
        let (value, size) = if buffer.is_empty() {
            (ptr::null_mut(), 0)
        } else {
            (buffer.as_mut_ptr().cast::<c_void>(), buffer.len())
        };

        // SAFETY: `path` and `name` are NUL-terminated and outlive the call;
        // `value`/`size` either describe a writable buffer we own or are
        // null/0, which requests the attribute length.
        let result = unsafe { (self.lgetxattr)(path.as_ptr(), name.as_ptr(), value, size) };
        if result < 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(result as usize)
        }
    }

    /// Reads attribute `name` of `path` without following symlinks.
    ///
    /// Starts with `initial_capacity` bytes. When the value does not fit the
    /// exact size is queried and the read is retried once with a buffer of
    /// that size; a second `ERANGE` (the value grew in between) is returned.
    pub(crate) fn read(
        &self,
        path: &Path,
        name: &CStr,
        initial_capacity: usize,
    ) -> io::Result<Vec<u8>> {
        let path = CString::new(path.as_os_str().as_bytes())?;
        let mut buffer = vec![0u8; initial_capacity.max(1)];

        let length = match self.call(&path, name, &mut buffer) {
            Ok(length) => length,
            Err(error) if error.raw_os_error() == Some(libc::ERANGE) => {
                let required = self.call(&path, name, &mut [])?;
                trace_label!("label of {:?} needs {} bytes", path, required);
                buffer = vec![0u8; required];
                self.call(&path, name, &mut buffer)?
            }
            Err(error) => return Err(error),
        };

        buffer.truncate(length);
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn resolve_finds_lgetxattr_in_libc() {
        assert!(XattrReader::resolve().is_some());
    }

    #[test]
    fn missing_attribute_reports_os_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("plain");
        fs::write(&file, b"x").expect("write");

        let reader = XattrReader::resolve().expect("lgetxattr");
        let error = reader
            .read(&file, c"user.census.absent", 16)
            .expect_err("attribute is not set");
        assert!(error.raw_os_error().is_some());
    }

    #[test]
    fn interior_nul_in_path_is_rejected() {
        let reader = XattrReader::resolve().expect("lgetxattr");
        let error = reader
            .read(Path::new("bad\0path"), c"security.selinux", 16)
            .expect_err("interior NUL");
        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
    }
}
