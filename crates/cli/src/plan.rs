use std::fmt;
use std::str::FromStr;

use crate::config::{CliError, ScanJob};
use crate::sections::SectionKind;

/// Depth used for "everything below" entries of a plan.
pub const UNBOUNDED_DEPTH: u32 = 1000;

/// Roots of the Android device census, in the order they are scanned.
///
/// `/` and `/proc` are only listed one level deep; the interesting parts of
/// both are scanned as roots of their own.
const ANDROID_ROOTS: &[(&str, u32)] = &[
    ("/", 1),
    ("/data/system", UNBOUNDED_DEPTH),
    ("/dev", UNBOUNDED_DEPTH),
    ("/etc", UNBOUNDED_DEPTH),
    ("/sbin", UNBOUNDED_DEPTH),
    ("/system", UNBOUNDED_DEPTH),
    ("/vendor", UNBOUNDED_DEPTH),
    ("/proc", 1),
    ("/proc/bus", UNBOUNDED_DEPTH),
    ("/proc/cpu", UNBOUNDED_DEPTH),
    ("/proc/tty", UNBOUNDED_DEPTH),
    ("/sys", 2),
    ("/sys/fs/selinux", UNBOUNDED_DEPTH),
];

/// Built-in census plans selectable with `--plan`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum CensusPlan {
    /// System partitions, device nodes and kernel interfaces of an Android
    /// device, plus copies of its small configuration files.
    Android,
    /// System properties, kernel parameters and the process environment.
    Properties,
}

impl CensusPlan {
    /// Name accepted on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::Properties => "properties",
        }
    }

    /// Scan jobs making up the plan.
    #[must_use]
    pub fn jobs(self) -> Vec<ScanJob> {
        let roots = match self {
            Self::Android => ANDROID_ROOTS,
            Self::Properties => &[],
        };
        roots
            .iter()
            .map(|&(root, depth)| ScanJob::new(root, depth))
            .collect()
    }

    /// Sections written after the records, in order.
    #[must_use]
    pub const fn sections(self) -> &'static [SectionKind] {
        match self {
            Self::Android => &[SectionKind::SmallFiles],
            Self::Properties => &[
                SectionKind::SystemProperties,
                SectionKind::Sysctl,
                SectionKind::EnvironmentVariables,
            ],
        }
    }
}

impl fmt::Display for CensusPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CensusPlan {
    type Err = CliError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "android" => Ok(Self::Android),
            "properties" => Ok(Self::Properties),
            other => Err(CliError::UnknownPlan(other.to_owned())),
        }
    }
}
