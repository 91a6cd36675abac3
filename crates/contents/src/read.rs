use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Size of each read while collecting a file.
pub const READ_CHUNK: usize = 1024;

/// Largest file the census copies; bigger files are skipped.
pub const MAX_SMALL_FILE_BYTES: u64 = 16 * 1024 * 1024;

/// Reads all of `path`, up to `limit` bytes.
///
/// Pseudo-files under `/proc` and `/sys` report a size of zero, so the file
/// is read in [`READ_CHUNK`] pieces until end of file instead of trusting
/// its status. Symlinks are followed, but only regular files are read; the
/// open never blocks on a FIFO.
///
/// # Errors
///
/// Fails when the file cannot be opened, is not a regular file, cannot be
/// read, or holds more than `limit` bytes.
pub fn read_small_file(path: &Path, limit: u64) -> io::Result<Vec<u8>> {
    let file = open_regular(path)?;
    let mut reader = file.take(limit.saturating_add(1));
    let mut contents = Vec::new();
    let mut chunk = [0_u8; READ_CHUNK];
    loop {
        match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(read) => contents.extend_from_slice(&chunk[..read]),
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            Err(error) => return Err(error),
        }
    }
    if contents.len() as u64 > limit {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("larger than {limit} bytes"),
        ));
    }
    Ok(contents)
}

#[cfg(unix)]
fn open_regular(path: &Path) -> io::Result<File> {
    use rustix::fs::{CWD, Mode, OFlags, openat};

    let fd = openat(
        CWD,
        path,
        OFlags::RDONLY | OFlags::NONBLOCK | OFlags::CLOEXEC,
        Mode::empty(),
    )?;
    ensure_regular(File::from(fd))
}

#[cfg(not(unix))]
fn open_regular(path: &Path) -> io::Result<File> {
    ensure_regular(File::open(path)?)
}

fn ensure_regular(file: File) -> io::Result<File> {
    if file.metadata()?.is_file() {
        Ok(file)
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        ))
    }
}
