use std::env;
use std::path::{Path, PathBuf};

use crate::error::WalkError;

/// Root and depth limit of one census.
///
/// A depth of 1 lists only the immediate children of the root; every level of
/// descent consumes one unit.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScanRequest {
    root: PathBuf,
    depth: u32,
}

impl ScanRequest {
    /// Validates and builds a request.
    ///
    /// Relative roots are resolved against the current directory so every
    /// emitted record carries an absolute path. `.` components and repeated
    /// separators are dropped, so `//` scans as `/`; `..` is kept as given.
    ///
    /// # Errors
    ///
    /// Returns [`WalkErrorKind::InvalidDepth`](crate::WalkErrorKind::InvalidDepth)
    /// when `depth` is zero and
    /// [`WalkErrorKind::CurrentDir`](crate::WalkErrorKind::CurrentDir) when a
    /// relative root cannot be resolved.
    pub fn new<P: Into<PathBuf>>(root: P, depth: u32) -> Result<Self, WalkError> {
        let root = root.into();
        if depth == 0 {
            return Err(WalkError::invalid_depth(root));
        }
        Ok(Self {
            root: absolutize(root)?,
            depth,
        })
    }

    /// Absolute directory the census starts from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maximum number of levels listed below the root.
    #[must_use]
    pub const fn depth(&self) -> u32 {
        self.depth
    }
}

fn absolutize(path: PathBuf) -> Result<PathBuf, WalkError> {
    let absolute = if path.is_absolute() {
        path
    } else {
        env::current_dir()
            .map_err(WalkError::current_dir)?
            .join(path)
    };
    Ok(absolute.components().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WalkErrorKind;

    #[test]
    fn zero_depth_is_rejected() {
        let error = ScanRequest::new("/tmp", 0).expect_err("depth 0");
        assert!(matches!(error.kind(), WalkErrorKind::InvalidDepth { .. }));
        assert_eq!(error.path(), Path::new("/tmp"));
    }

    #[test]
    fn absolute_root_is_kept() {
        let request = ScanRequest::new("/etc", 3).expect("request");
        assert_eq!(request.root(), Path::new("/etc"));
        assert_eq!(request.depth(), 3);
    }

    #[test]
    fn relative_root_is_made_absolute() {
        let request = ScanRequest::new("some/dir", 1).expect("request");
        assert!(request.root().is_absolute());
        assert!(request.root().ends_with("some/dir"));
    }

    #[test]
    fn current_directory_root_has_no_dot_component() {
        let request = ScanRequest::new(".", 1).expect("request");
        let cwd = env::current_dir().expect("cwd");
        assert_eq!(request.root(), cwd.as_path());
        assert!(!request.root().to_string_lossy().contains("/."));
    }

    #[cfg(unix)]
    #[test]
    fn doubled_and_dotted_separators_collapse() {
        let request = ScanRequest::new("//", 1).expect("request");
        assert_eq!(request.root().as_os_str(), "/");

        let request = ScanRequest::new("/etc/./ssl//certs/", 2).expect("request");
        assert_eq!(request.root().as_os_str(), "/etc/ssl/certs");

        let request = ScanRequest::new("/usr/../etc", 2).expect("request");
        assert_eq!(request.root().as_os_str(), "/usr/../etc");
    }
}
