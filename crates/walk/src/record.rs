use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::Path;

/// Link target recorded when a symlink exists but cannot be read.
pub const LINK_READ_ERROR: &[u8] = b"error";

/// Mask selecting the file type bits of a mode.
pub const S_IFMT: u32 = 0o170_000;
const S_IFSOCK: u32 = 0o140_000;
const S_IFLNK: u32 = 0o120_000;
const S_IFREG: u32 = 0o100_000;
const S_IFBLK: u32 = 0o060_000;
const S_IFDIR: u32 = 0o040_000;
const S_IFCHR: u32 = 0o020_000;
const S_IFIFO: u32 = 0o010_000;

/// Entry type decoded from the type bits of a mode.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum EntryKind {
    /// Regular file.
    Regular,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink,
    /// Character device node.
    CharDevice,
    /// Block device node.
    BlockDevice,
    /// Named pipe.
    Fifo,
    /// Unix domain socket.
    Socket,
    /// Type bits that match none of the above.
    Unknown,
}

impl EntryKind {
    /// Decodes the type bits of `mode`.
    #[must_use]
    pub const fn from_mode(mode: u32) -> Self {
        match mode & S_IFMT {
            S_IFREG => Self::Regular,
            S_IFDIR => Self::Directory,
            S_IFLNK => Self::Symlink,
            S_IFCHR => Self::CharDevice,
            S_IFBLK => Self::BlockDevice,
            S_IFIFO => Self::Fifo,
            S_IFSOCK => Self::Socket,
            _ => Self::Unknown,
        }
    }

    /// Single-character tag in the style of `ls -l`.
    #[must_use]
    pub const fn tag(self) -> char {
        match self {
            Self::Regular => '-',
            Self::Directory => 'd',
            Self::Symlink => 'l',
            Self::CharDevice => 'c',
            Self::BlockDevice => 'b',
            Self::Fifo => 'p',
            Self::Socket => 's',
            Self::Unknown => '?',
        }
    }
}

/// Metadata snapshot of one filesystem entry.
///
/// Records are immutable once built. `link_target` is present exactly when
/// the type bits of `mode` say symlink.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileRecord {
    path: Vec<u8>,
    link_target: Option<Vec<u8>>,
    uid: u32,
    gid: u32,
    size: u64,
    mode: u32,
    security_label: Option<Vec<u8>>,
}

impl FileRecord {
    /// Builds a record from non-following status information.
    ///
    /// `link_target` is dropped for non-symlink entries and replaced with
    /// [`LINK_READ_ERROR`] for symlinks when absent, so the type/target
    /// invariant holds regardless of what the caller passes.
    pub(crate) fn from_metadata(
        path: &Path,
        metadata: &fs::Metadata,
        link_target: Option<Vec<u8>>,
        security_label: Option<Vec<u8>>,
    ) -> Self {
        let (uid, gid, mode) = ownership_and_mode(metadata);
        Self::from_parts(
            path_bytes(path),
            link_target,
            uid,
            gid,
            metadata.len(),
            mode,
            security_label,
        )
    }

    /// Builds a record from raw field values.
    ///
    /// Hosts replaying stored census data use this; the symlink invariant is
    /// enforced the same way as for records produced by a scan.
    #[must_use]
    pub fn from_parts(
        path: Vec<u8>,
        link_target: Option<Vec<u8>>,
        uid: u32,
        gid: u32,
        size: u64,
        mode: u32,
        security_label: Option<Vec<u8>>,
    ) -> Self {
        let link_target = if EntryKind::from_mode(mode) == EntryKind::Symlink {
            Some(link_target.unwrap_or_else(|| LINK_READ_ERROR.to_vec()))
        } else {
            None
        };
        Self {
            path,
            link_target,
            uid,
            gid,
            size,
            mode,
            security_label,
        }
    }

    /// Full path of the entry as visited.
    #[must_use]
    pub fn path(&self) -> &[u8] {
        &self.path
    }

    /// Path as a [`Path`].
    #[cfg(unix)]
    #[must_use]
    pub fn path_buf(&self) -> std::path::PathBuf {
        use std::os::unix::ffi::OsStrExt;
        Path::new(std::ffi::OsStr::from_bytes(&self.path)).to_path_buf()
    }

    /// Path as a [`Path`], decoded lossily.
    #[cfg(not(unix))]
    #[must_use]
    pub fn path_buf(&self) -> std::path::PathBuf {
        std::path::PathBuf::from(self.path_lossy().into_owned())
    }

    /// Symlink target, if the entry is a symlink.
    #[must_use]
    pub fn link_target(&self) -> Option<&[u8]> {
        self.link_target.as_deref()
    }

    /// Reports whether the link target is the read-error sentinel.
    #[must_use]
    pub fn link_target_degraded(&self) -> bool {
        self.link_target.as_deref() == Some(LINK_READ_ERROR)
    }

    /// Owner user id.
    #[must_use]
    pub const fn uid(&self) -> u32 {
        self.uid
    }

    /// Owner group id.
    #[must_use]
    pub const fn gid(&self) -> u32 {
        self.gid
    }

    /// Raw size field.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Raw mode: type bits and permission bits.
    #[must_use]
    pub const fn mode(&self) -> u32 {
        self.mode
    }

    /// Permission bits including setuid, setgid and sticky.
    #[must_use]
    pub const fn permissions(&self) -> u32 {
        self.mode & 0o7777
    }

    /// Entry type decoded from the mode.
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        EntryKind::from_mode(self.mode)
    }

    /// Security label, if the entry has one and the platform supports labels.
    #[must_use]
    pub fn security_label(&self) -> Option<&[u8]> {
        self.security_label.as_deref()
    }

    /// Path rendered lossily as UTF-8.
    #[must_use]
    pub fn path_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.path)
    }

    /// Link target rendered lossily as UTF-8.
    #[must_use]
    pub fn link_target_lossy(&self) -> Option<Cow<'_, str>> {
        self.link_target.as_deref().map(String::from_utf8_lossy)
    }

    /// Security label rendered lossily as UTF-8.
    #[must_use]
    pub fn security_label_lossy(&self) -> Option<Cow<'_, str>> {
        self.security_label.as_deref().map(String::from_utf8_lossy)
    }
}

impl fmt::Display for FileRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "path={} type={} linkpath={} uid={} gid={} size={} mode={:o} label={}",
            self.path_lossy(),
            self.kind().tag(),
            self.link_target_lossy().as_deref().unwrap_or("-"),
            self.uid,
            self.gid,
            self.size,
            self.mode,
            self.security_label_lossy().as_deref().unwrap_or("-"),
        )
    }
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    path.as_os_str().as_bytes().to_vec()
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> Vec<u8> {
    path.to_string_lossy().into_owned().into_bytes()
}

#[cfg(unix)]
fn ownership_and_mode(metadata: &fs::Metadata) -> (u32, u32, u32) {
    use std::os::unix::fs::MetadataExt;
    (metadata.uid(), metadata.gid(), metadata.mode())
}

#[cfg(not(unix))]
fn ownership_and_mode(metadata: &fs::Metadata) -> (u32, u32, u32) {
    let file_type = metadata.file_type();
    let type_bits = if file_type.is_symlink() {
        S_IFLNK
    } else if file_type.is_dir() {
        S_IFDIR
    } else {
        S_IFREG
    };
    let permission_bits = if metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    };
    (0, 0, type_bits | permission_bits)
}

#[cfg(feature = "serde")]
impl serde::Serialize for FileRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("FileRecord", 7)?;
        state.serialize_field("path", &self.path_lossy())?;
        state.serialize_field("linkPath", &self.link_target_lossy())?;
        state.serialize_field("uid", &self.uid)?;
        state.serialize_field("gid", &self.gid)?;
        state.serialize_field("size", &self.size)?;
        state.serialize_field("mode", &self.mode)?;
        state.serialize_field("selinuxContext", &self.security_label_lossy())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_decodes_every_type() {
        assert_eq!(EntryKind::from_mode(0o100_644), EntryKind::Regular);
        assert_eq!(EntryKind::from_mode(0o040_755), EntryKind::Directory);
        assert_eq!(EntryKind::from_mode(0o120_777), EntryKind::Symlink);
        assert_eq!(EntryKind::from_mode(0o020_620), EntryKind::CharDevice);
        assert_eq!(EntryKind::from_mode(0o060_660), EntryKind::BlockDevice);
        assert_eq!(EntryKind::from_mode(0o010_600), EntryKind::Fifo);
        assert_eq!(EntryKind::from_mode(0o140_777), EntryKind::Socket);
        assert_eq!(EntryKind::from_mode(0o000_644), EntryKind::Unknown);
    }

    #[test]
    fn non_symlink_drops_link_target() {
        let record = FileRecord::from_parts(
            b"/etc/passwd".to_vec(),
            Some(b"ignored".to_vec()),
            0,
            0,
            1024,
            0o100_644,
            None,
        );
        assert!(record.link_target().is_none());
        assert_eq!(record.kind(), EntryKind::Regular);
    }

    #[test]
    fn symlink_without_target_gets_sentinel() {
        let record =
            FileRecord::from_parts(b"/bin".to_vec(), None, 0, 0, 7, 0o120_777, None);
        assert_eq!(record.link_target(), Some(LINK_READ_ERROR));
        assert!(record.link_target_degraded());
    }

    #[test]
    fn permissions_mask_type_bits() {
        let record =
            FileRecord::from_parts(b"/tmp".to_vec(), None, 0, 0, 4096, 0o041_777, None);
        assert_eq!(record.permissions(), 0o1777);
        assert_eq!(record.kind().tag(), 'd');
    }

    #[test]
    fn display_matches_census_line() {
        let record = FileRecord::from_parts(
            b"/system/bin/sh".to_vec(),
            Some(b"mksh".to_vec()),
            0,
            2000,
            4,
            0o120_755,
            Some(b"u:object_r:system_file:s0".to_vec()),
        );
        assert_eq!(
            record.to_string(),
            "path=/system/bin/sh type=l linkpath=mksh uid=0 gid=2000 size=4 mode=120755 \
             label=u:object_r:system_file:s0"
        );
    }

    #[test]
    fn display_marks_absent_fields() {
        let record =
            FileRecord::from_parts(b"/a.txt".to_vec(), None, 1000, 1000, 5, 0o100_644, None);
        assert!(record.to_string().contains(" type=- linkpath=- "));
        assert!(record.to_string().ends_with("label=-"));
    }

    #[test]
    fn lossy_rendering_replaces_invalid_utf8() {
        let record =
            FileRecord::from_parts(b"/bad\xffname".to_vec(), None, 0, 0, 0, 0o100_600, None);
        assert_eq!(record.path_lossy(), "/bad\u{fffd}name");
        assert_eq!(record.path(), b"/bad\xffname");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_with_uploader_field_names() {
        let record = FileRecord::from_parts(
            b"/b".to_vec(),
            Some(b"a.txt".to_vec()),
            1,
            2,
            5,
            0o120_777,
            None,
        );
        let json = serde_json::to_value(&record).expect("serialize");
        assert_eq!(json["path"], "/b");
        assert_eq!(json["linkPath"], "a.txt");
        assert_eq!(json["uid"], 1);
        assert_eq!(json["gid"], 2);
        assert_eq!(json["size"], 5);
        assert_eq!(json["mode"], 0o120_777);
        assert!(json["selinuxContext"].is_null());
    }
}
