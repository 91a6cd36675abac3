//! Directory listing for the walker.
//!
//! Nested directories are opened with `O_DIRECTORY | O_NOFOLLOW`, so a
//! directory swapped for a symlink after it was inspected fails to open
//! (`ELOOP`/`ENOTDIR`) instead of being listed through the link. Only the
//! root of a scan may be reached through a symlink.

use std::ffi::OsString;
use std::io;
use std::path::Path;

/// Whether the last component of a directory path may be a symlink.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Follow {
    /// Resolve a trailing symlink; used for scan roots.
    Root,
    /// Refuse a trailing symlink; used for every descendant.
    Never,
}

#[cfg(unix)]
mod imp {
    use std::ffi::{OsStr, OsString};
    use std::io;
    use std::os::unix::ffi::OsStrExt;
    use std::path::Path;

    use rustix::fs::{CWD, Dir, Mode, OFlags, openat};

    use super::Follow;

    pub(crate) struct Listing {
        dir: Dir,
    }

    pub(crate) fn open(path: &Path, follow: Follow) -> io::Result<Listing> {
        let mut flags = OFlags::RDONLY | OFlags::DIRECTORY | OFlags::CLOEXEC;
        if follow == Follow::Never {
            flags |= OFlags::NOFOLLOW;
        }
        let fd = openat(CWD, path, flags, Mode::empty())?;
        let dir = Dir::new(fd)?;
        Ok(Listing { dir })
    }

    impl Iterator for Listing {
        type Item = io::Result<OsString>;

        fn next(&mut self) -> Option<Self::Item> {
            loop {
                let entry = match self.dir.next()? {
                    Ok(entry) => entry,
                    Err(errno) => return Some(Err(errno.into())),
                };
                let name = entry.file_name().to_bytes();
                if name == b"." || name == b".." {
                    continue;
                }
                return Some(Ok(OsStr::from_bytes(name).to_os_string()));
            }
        }
    }
}

#[cfg(not(unix))]
mod imp {
    use std::ffi::OsString;
    use std::fs::{self, ReadDir};
    use std::io;
    use std::path::Path;

    use super::Follow;

    pub(crate) struct Listing {
        entries: ReadDir,
    }

    pub(crate) fn open(path: &Path, follow: Follow) -> io::Result<Listing> {
        if follow == Follow::Never && fs::symlink_metadata(path)?.file_type().is_symlink() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "refusing to list a directory through a symlink",
            ));
        }
        Ok(Listing {
            entries: fs::read_dir(path)?,
        })
    }

    impl Iterator for Listing {
        type Item = io::Result<OsString>;

        fn next(&mut self) -> Option<Self::Item> {
            self.entries
                .next()
                .map(|entry| entry.map(|entry| entry.file_name()))
        }
    }
}

/// Opens `path` for listing; the iterator yields entry names without `.`
/// and `..`.
pub(crate) fn open(
    path: &Path,
    follow: Follow,
) -> io::Result<impl Iterator<Item = io::Result<OsString>> + use<>> {
    imp::open(path, follow)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::fs;
    use std::os::unix::fs::symlink;

    fn names(path: &Path, follow: Follow) -> io::Result<BTreeSet<OsString>> {
        open(path, follow)?.collect()
    }

    #[test]
    fn lists_names_without_dot_entries() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("a"), b"").expect("a");
        fs::create_dir(temp.path().join("b")).expect("b");

        let listed = names(temp.path(), Follow::Never).expect("listing");
        assert_eq!(
            listed,
            BTreeSet::from([OsString::from("a"), OsString::from("b")])
        );
    }

    #[test]
    fn symlink_to_directory_is_refused_below_the_root() {
        let temp = tempfile::tempdir().expect("tempdir");
        let real = temp.path().join("real");
        fs::create_dir(&real).expect("real");
        fs::write(real.join("inside"), b"").expect("inside");
        let alias = temp.path().join("alias");
        symlink(&real, &alias).expect("symlink");

        let error = names(&alias, Follow::Never).expect_err("symlink refused");
        assert!(
            matches!(error.raw_os_error(), Some(code) if code == eloop() || code == enotdir()),
            "{error}"
        );

        let listed = names(&alias, Follow::Root).expect("root may be a symlink");
        assert!(listed.contains(&OsString::from("inside")));
    }

    #[test]
    fn regular_file_is_not_a_directory() {
        let temp = tempfile::tempdir().expect("tempdir");
        let file = temp.path().join("file");
        fs::write(&file, b"x").expect("file");

        let error = names(&file, Follow::Never).expect_err("not a directory");
        assert_eq!(error.raw_os_error(), Some(enotdir()));
    }

    fn eloop() -> i32 {
        rustix::io::Errno::LOOP.raw_os_error()
    }

    fn enotdir() -> i32 {
        rustix::io::Errno::NOTDIR.raw_os_error()
    }
}
