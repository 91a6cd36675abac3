use std::path::Path;
use std::sync::OnceLock;

use logging::trace_label;

use crate::config::LabelConfig;
use crate::source::{LabelCapability, LabelSource};
use crate::sys::XattrReader;

/// Reads mandatory-access-control labels through a runtime-probed facility.
///
/// The probe runs once, at construction. When `lgetxattr` cannot be found
/// the resolver is permanently unsupported and every lookup returns `None`;
/// the probe itself never fails.
///
/// Construct one explicitly and pass it to the walker, or use
/// [`SecurityLabelResolver::shared`] for a process-wide instance.
#[derive(Debug)]
pub struct SecurityLabelResolver {
    reader: Option<XattrReader>,
    config: LabelConfig,
}

impl SecurityLabelResolver {
    /// Probes for the label facility and reads `security.selinux`.
    #[must_use]
    pub fn probe() -> Self {
        Self::probe_with(LabelConfig::default())
    }

    /// Probes for the label facility using `config`.
    #[must_use]
    pub fn probe_with(config: LabelConfig) -> Self {
        let reader = XattrReader::resolve();
        if reader.is_some() {
            trace_label!(
                "security label lookup available, reading {:?}",
                config.attribute()
            );
        } else {
            tracing::info!(
                target: "census::label",
                "security label lookup unavailable; labels will be reported as absent"
            );
        }
        Self { reader, config }
    }

    /// Resolver that never returns labels.
    #[must_use]
    pub fn unsupported() -> Self {
        Self {
            reader: None,
            config: LabelConfig::default(),
        }
    }

    /// Process-wide resolver, probed on first use.
    ///
    /// Concurrent first callers block until the single probe finishes and
    /// all observe the same instance.
    pub fn shared() -> &'static Self {
        static SHARED: OnceLock<SecurityLabelResolver> = OnceLock::new();
        SHARED.get_or_init(Self::probe)
    }
}

impl LabelSource for SecurityLabelResolver {
    fn capability(&self) -> LabelCapability {
        if self.reader.is_some() {
            LabelCapability::Supported
        } else {
            LabelCapability::Unsupported
        }
    }

    fn lookup(&self, path: &Path) -> Option<Vec<u8>> {
        let reader = self.reader.as_ref()?;
        match reader.read(
            path,
            self.config.attribute(),
            self.config.initial_capacity(),
        ) {
            Ok(value) => normalize_label(value),
            Err(error) => {
                logging::trace_inspect!("no label for {}: {}", path.display(), error);
                None
            }
        }
    }
}

/// Cuts the value at its first NUL and maps an empty result to `None`.
///
/// Labels are stored NUL-terminated, and some platforms report success with
/// an empty value for unset attributes.
fn normalize_label(mut value: Vec<u8>) -> Option<Vec<u8>> {
    if let Some(end) = value.iter().position(|&byte| byte == 0) {
        value.truncate(end);
    }
    if value.is_empty() { None } else { Some(value) }
}
