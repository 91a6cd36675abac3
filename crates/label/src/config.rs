use std::ffi::{CStr, CString};

use thiserror::Error;

/// Extended attribute holding the SELinux security context.
pub const SELINUX_ATTRIBUTE: &CStr = c"security.selinux";

/// Size of the first read attempt; SELinux contexts rarely exceed it.
pub const DEFAULT_INITIAL_CAPACITY: usize = 256;

/// Rejected label configuration.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum LabelConfigError {
    /// The attribute name was empty.
    #[error("label attribute name must not be empty")]
    EmptyAttribute,
    /// The attribute name contained a NUL byte.
    #[error("label attribute name '{0}' contains a NUL byte")]
    InteriorNul(String),
}

/// Which attribute to read and how large the first read buffer is.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LabelConfig {
    attribute: CString,
    initial_capacity: usize,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            attribute: SELINUX_ATTRIBUTE.to_owned(),
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}

impl LabelConfig {
    /// Reads `security.selinux` with a 256-byte first attempt.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `attribute` instead, e.g. `security.SMACK64` or `security.apparmor`.
    pub fn with_attribute(mut self, attribute: impl Into<Vec<u8>>) -> Result<Self, LabelConfigError> {
        let bytes = attribute.into();
        if bytes.is_empty() {
            return Err(LabelConfigError::EmptyAttribute);
        }
        self.attribute = CString::new(bytes).map_err(|error| {
            LabelConfigError::InteriorNul(String::from_utf8_lossy(&error.into_vec()).into_owned())
        })?;
        Ok(self)
    }

    /// Sets the first read buffer size (at least one byte).
    #[must_use]
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity.max(1);
        self
    }

    /// Attribute name passed to the lookup.
    #[must_use]
    pub fn attribute(&self) -> &CStr {
        &self.attribute
    }

    /// First read buffer size.
    #[must_use]
    pub const fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }
}
