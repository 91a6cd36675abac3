use std::fmt;
use std::path::Path;
use std::str::FromStr;

use contents::{
    ContentsError, FileSelection, GETPROP, MAX_SMALL_FILE_BYTES, SYSCTL_ROOT, Section,
    collect_small_files, collect_sysctl, environment_variables, system_properties,
};
use logging::Logger;

use crate::config::CliError;

/// Files copied by the `small_files` section.
const ANDROID_SMALL_FILES: &[&str] = &[
    "/default.prop",
    "/property_contexts",
    "/seapp_contexts",
    "/sepolicy",
    "/data/local.prop",
    "/factory/factory.prop",
    "/proc/cmdline",
    "/proc/config.gz",
    "/proc/consoles",
    "/proc/cpuinfo",
    "/proc/devices",
    "/proc/fb",
    "/proc/filesystems",
    "/proc/iomem",
    "/proc/meminfo",
    "/proc/misc",
    "/proc/modules",
    "/proc/mounts",
    "/proc/pagetypeinfo",
    "/proc/slabinfo",
    "/proc/version",
    "/proc/vmallocinfo",
    "/proc/vmstat",
    "/proc/zoneinfo",
    "/proc/bus/input/devices",
    "/proc/net/unix",
    "/proc/self/environ",
    "/proc/self/maps",
    "/proc/tty/drivers",
    "/system/build.prop",
    "/system/default.prop",
];

/// `(base, pattern, exclude)` triples copied by the `small_files` section.
const ANDROID_SMALL_FILE_PATTERNS: &[(&str, &str, Option<&str>)] = &[
    ("/", "init*.rc", None),
    ("/", "ueventd*.rc", None),
    ("/system/etc/permissions", "*.xml", None),
    ("/sys/fs/selinux", "**", Some("class/**")),
    ("/sys/module", "**/version", None),
];

/// Per-process files copied for every numeric entry of `/proc`.
const ANDROID_PROCESS_FILES: &[&str] = &["cmdline", "status", "attr/current", "attr/fscreate"];

/// Named groups of values written next to the file records.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SectionKind {
    /// Base64 copies of small configuration and kernel files.
    SmallFiles,
    /// Kernel parameters below `/proc/sys`.
    Sysctl,
    /// Environment of the census process.
    EnvironmentVariables,
    /// Android system properties reported by `getprop`.
    SystemProperties,
}

impl SectionKind {
    /// Key of the section in the output and name accepted by `--section`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::SmallFiles => "small_files",
            Self::Sysctl => "sysctl",
            Self::EnvironmentVariables => "environment_variables",
            Self::SystemProperties => "system_properties",
        }
    }

    /// Collects the section's values.
    ///
    /// # Errors
    ///
    /// Fails when the section's source is unavailable as a whole: the
    /// kernel parameter directory cannot be listed or `getprop` cannot run.
    pub fn collect(self, logger: &dyn Logger) -> Result<Section, ContentsError> {
        match self {
            Self::SmallFiles => Ok(collect_small_files(
                &android_small_files()?,
                MAX_SMALL_FILE_BYTES,
                logger,
            )),
            Self::Sysctl => collect_sysctl(Path::new(SYSCTL_ROOT), logger),
            Self::EnvironmentVariables => Ok(environment_variables()),
            Self::SystemProperties => system_properties(GETPROP),
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SectionKind {
    type Err = CliError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "small_files" => Ok(Self::SmallFiles),
            "sysctl" => Ok(Self::Sysctl),
            "environment_variables" => Ok(Self::EnvironmentVariables),
            "system_properties" => Ok(Self::SystemProperties),
            other => Err(CliError::UnknownSection(other.to_owned())),
        }
    }
}

/// File selection of the Android `small_files` section.
pub(crate) fn android_small_files() -> Result<FileSelection, ContentsError> {
    let mut selection = ANDROID_SMALL_FILES
        .iter()
        .fold(FileSelection::new(), |selection, &path| selection.path(path));
    for &(base, pattern, exclude) in ANDROID_SMALL_FILE_PATTERNS {
        selection = match exclude {
            Some(exclude) => selection.pattern_excluding(base, pattern, exclude)?,
            None => selection.pattern(base, pattern)?,
        };
    }
    Ok(selection.per_process("/proc", ANDROID_PROCESS_FILES.iter().copied()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_names_round_trip() {
        for kind in [
            SectionKind::SmallFiles,
            SectionKind::Sysctl,
            SectionKind::EnvironmentVariables,
            SectionKind::SystemProperties,
        ] {
            assert_eq!(kind.key().parse::<SectionKind>().expect("known"), kind);
        }
    }

    #[test]
    fn unknown_section_is_rejected() {
        let error = "kernel_logs".parse::<SectionKind>().expect_err("unknown");
        assert!(matches!(error, CliError::UnknownSection(name) if name == "kernel_logs"));
    }

    #[test]
    fn android_patterns_compile() {
        assert!(android_small_files().is_ok());
    }

    #[test]
    fn environment_section_reflects_the_process() {
        let section = SectionKind::EnvironmentVariables
            .collect(&logging::CapturingLogger::new())
            .expect("environment");
        assert_eq!(section.len(), std::env::vars_os().count());
    }
}
