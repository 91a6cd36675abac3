use std::path::Path;

/// Whether security labels can be read on this system at all.
///
/// Kept separate from per-entry lookups so callers can tell "the platform
/// has no label facility" apart from "this entry has no label".
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum LabelCapability {
    /// The label facility was found; lookups may return labels.
    Supported,
    /// The facility is absent; every lookup returns `None`.
    Unsupported,
}

impl LabelCapability {
    /// Returns `true` for [`LabelCapability::Supported`].
    #[must_use]
    pub const fn is_supported(self) -> bool {
        matches!(self, Self::Supported)
    }
}

/// Source of per-entry security labels.
///
/// Lookups never fail: a missing facility, a missing attribute and any I/O
/// error all collapse to `None`.
pub trait LabelSource: Send + Sync {
    /// Reports whether the underlying facility exists.
    fn capability(&self) -> LabelCapability;

    /// Returns the label of `path` without following symlinks.
    fn lookup(&self, path: &Path) -> Option<Vec<u8>>;
}

impl<T: LabelSource + ?Sized> LabelSource for &T {
    fn capability(&self) -> LabelCapability {
        (**self).capability()
    }

    fn lookup(&self, path: &Path) -> Option<Vec<u8>> {
        (**self).lookup(path)
    }
}

/// Label source returning the same label for every path.
///
/// Useful as a deterministic stand-in for the real resolver in tests.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FixedLabel {
    label: Option<Vec<u8>>,
}

impl FixedLabel {
    /// Reports `Supported` and returns `label` for every entry.
    #[must_use]
    pub fn new(label: impl Into<Vec<u8>>) -> Self {
        Self {
            label: Some(label.into()),
        }
    }

    /// Reports `Supported` but returns no label for any entry.
    #[must_use]
    pub const fn unlabelled() -> Self {
        Self { label: None }
    }
}

impl LabelSource for FixedLabel {
    fn capability(&self) -> LabelCapability {
        LabelCapability::Supported
    }

    fn lookup(&self, _path: &Path) -> Option<Vec<u8>> {
        self.label.clone()
    }
}
