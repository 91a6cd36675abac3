use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use label::{LabelConfig, LabelConfigError};
use logging::VerbosityConfig;
use thiserror::Error;

use crate::arguments::ParsedArgs;
use crate::plan::{CensusPlan, UNBOUNDED_DEPTH};
use crate::sections::SectionKind;

/// Depth applied to roots given without `:DEPTH` when `--depth` is absent.
pub const DEFAULT_DEPTH: u32 = UNBOUNDED_DEPTH;

/// Errors produced while turning arguments into a [`CensusConfig`].
#[derive(Debug, Error)]
pub enum CliError {
    /// `clap` rejected the command line.
    #[error("{0}")]
    Parse(#[from] clap::Error),
    /// A depth value was not a positive integer.
    #[error("invalid depth '{0}': expected a positive integer")]
    InvalidDepth(String),
    /// A root operand was empty.
    #[error("empty root path")]
    EmptyRoot,
    /// No plan, root or section was given.
    #[error("no roots to scan: pass ROOT[:DEPTH], --plan or --section")]
    NoRoots,
    /// `--plan` named an unknown plan.
    #[error("unknown plan '{0}': expected 'android' or 'properties'")]
    UnknownPlan(String),
    /// `--section` named an unknown section.
    #[error(
        "unknown section '{0}': expected small_files, sysctl, environment_variables or system_properties"
    )]
    UnknownSection(String),
    /// `--format` named an unknown format.
    #[error("unknown format '{0}': expected json, jsonl or text")]
    UnknownFormat(String),
    /// `--label-attr` could not be used as an attribute name.
    #[error("invalid label attribute: {0}")]
    LabelAttribute(#[from] LabelConfigError),
}

/// One root and its depth limit.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScanJob {
    root: PathBuf,
    depth: u32,
}

impl ScanJob {
    /// Creates a job scanning `root` to `depth` levels.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, depth: u32) -> Self {
        Self {
            root: root.into(),
            depth,
        }
    }

    /// Parses a `ROOT[:DEPTH]` operand.
    ///
    /// The suffix after the last `:` is only treated as a depth when it is
    /// made of ASCII digits, so roots containing colons still work.
    ///
    /// # Errors
    ///
    /// Fails for an empty root and for a zero or out-of-range depth.
    pub fn parse(operand: &OsStr, default_depth: u32) -> Result<Self, CliError> {
        if operand.is_empty() {
            return Err(CliError::EmptyRoot);
        }
        let Some(text) = operand.to_str() else {
            return Ok(Self::new(operand, default_depth));
        };
        match text.rsplit_once(':') {
            Some((root, depth))
                if !depth.is_empty() && depth.bytes().all(|byte| byte.is_ascii_digit()) =>
            {
                if root.is_empty() {
                    return Err(CliError::EmptyRoot);
                }
                Ok(Self::new(root, parse_depth(depth)?))
            }
            _ => Ok(Self::new(text, default_depth)),
        }
    }

    /// Directory the job starts from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Depth limit of the job.
    #[must_use]
    pub const fn depth(&self) -> u32 {
        self.depth
    }
}

/// Parses a strictly positive depth.
pub(crate) fn parse_depth(text: &str) -> Result<u32, CliError> {
    match text.parse::<u32>() {
        Ok(0) | Err(_) => Err(CliError::InvalidDepth(text.to_owned())),
        Ok(depth) => Ok(depth),
    }
}

/// How records are written to standard output.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum OutputFormat {
    /// A single `{"file_permissions": [...]}` document.
    Json,
    /// One JSON object per line.
    #[default]
    JsonLines,
    /// One `path=... mode=...` line per record.
    Text,
}

impl OutputFormat {
    /// Name accepted on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::JsonLines => "jsonl",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "json" => Ok(Self::Json),
            "jsonl" => Ok(Self::JsonLines),
            "text" => Ok(Self::Text),
            other => Err(CliError::UnknownFormat(other.to_owned())),
        }
    }
}

/// Where security labels come from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LabelMode {
    /// Probe the platform facility and read the given attribute.
    Probe {
        /// Attribute configuration; the default reads `security.selinux`.
        config: LabelConfig,
    },
    /// Never look labels up.
    Disabled,
}

impl Default for LabelMode {
    fn default() -> Self {
        Self::Probe {
            config: LabelConfig::new(),
        }
    }
}

/// Fully validated census configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CensusConfig {
    /// Jobs in execution order: plan roots first, then explicit roots.
    pub jobs: Vec<ScanJob>,
    /// Sections written after the records: plan sections first, then
    /// `--section` values, without repeats.
    pub sections: Vec<SectionKind>,
    /// Output format for records.
    pub format: OutputFormat,
    /// Label source selection.
    pub labels: LabelMode,
    /// Log verbosity.
    pub verbosity: VerbosityConfig,
}

impl CensusConfig {
    /// Validates parsed arguments.
    ///
    /// # Errors
    ///
    /// Returns [`CliError`] for invalid depths, empty roots, unknown plans,
    /// sections or formats, unusable label attributes, and when nothing would
    /// be collected.
    pub fn from_parsed(parsed: ParsedArgs) -> Result<Self, CliError> {
        let default_depth = match parsed.depth.as_deref() {
            Some(value) => parse_depth(&lossy(value))?,
            None => DEFAULT_DEPTH,
        };

        let mut jobs = Vec::new();
        let mut sections: Vec<SectionKind> = Vec::new();
        let mut add_section = |section: SectionKind| {
            if !sections.contains(&section) {
                sections.push(section);
            }
        };
        for name in &parsed.plans {
            let plan = lossy(name).parse::<CensusPlan>()?;
            jobs.extend(plan.jobs());
            plan.sections().iter().copied().for_each(&mut add_section);
        }
        for name in &parsed.sections {
            add_section(lossy(name).parse()?);
        }
        for operand in &parsed.roots {
            jobs.push(ScanJob::parse(operand, default_depth)?);
        }
        if jobs.is_empty() && sections.is_empty() {
            return Err(CliError::NoRoots);
        }

        let format = match parsed.format.as_deref() {
            Some(value) => lossy(value).parse()?,
            None => OutputFormat::default(),
        };

        let labels = if parsed.no_labels {
            LabelMode::Disabled
        } else {
            let mut config = LabelConfig::new();
            if let Some(attribute) = parsed.label_attribute {
                config = config.with_attribute(os_bytes(attribute))?;
            }
            LabelMode::Probe { config }
        };

        let mut verbosity = VerbosityConfig::from_verbose_level(parsed.verbose);
        if parsed.quiet {
            verbosity = verbosity.quiet();
        }

        Ok(Self {
            jobs,
            sections,
            format,
            labels,
            verbosity,
        })
    }
}

fn lossy(value: &OsStr) -> String {
    value.to_string_lossy().into_owned()
}

#[cfg(unix)]
fn os_bytes(value: OsString) -> Vec<u8> {
    use std::os::unix::ffi::OsStringExt;
    value.into_vec()
}

#[cfg(not(unix))]
fn os_bytes(value: OsString) -> Vec<u8> {
    value.to_string_lossy().into_owned().into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arguments::parse_args;

    fn config(args: &[&str]) -> Result<CensusConfig, CliError> {
        CensusConfig::from_parsed(parse_args(args.iter().copied()).expect("parse"))
    }

    #[test]
    fn operand_depth_suffix_overrides_default() {
        let job = ScanJob::parse(OsStr::new("/proc:1"), 7).expect("job");
        assert_eq!(job, ScanJob::new("/proc", 1));

        let job = ScanJob::parse(OsStr::new("/etc"), 7).expect("job");
        assert_eq!(job, ScanJob::new("/etc", 7));
    }

    #[test]
    fn non_numeric_suffix_stays_in_the_root() {
        let job = ScanJob::parse(OsStr::new("/mnt/a:b"), 3).expect("job");
        assert_eq!(job.root(), Path::new("/mnt/a:b"));
        assert_eq!(job.depth(), 3);
    }

    #[test]
    fn zero_depth_is_rejected_everywhere() {
        assert!(matches!(
            ScanJob::parse(OsStr::new("/etc:0"), 1),
            Err(CliError::InvalidDepth(_))
        ));
        assert!(matches!(
            config(&["census", "-d", "0", "/etc"]),
            Err(CliError::InvalidDepth(_))
        ));
    }

    #[test]
    fn empty_roots_are_rejected() {
        assert!(matches!(
            ScanJob::parse(OsStr::new(""), 1),
            Err(CliError::EmptyRoot)
        ));
        assert!(matches!(
            ScanJob::parse(OsStr::new(":3"), 1),
            Err(CliError::EmptyRoot)
        ));
    }

    #[test]
    fn nothing_to_scan_is_an_error() {
        assert!(matches!(config(&["census"]), Err(CliError::NoRoots)));
    }

    #[test]
    fn plan_jobs_precede_explicit_roots() {
        let planned = config(&["census", "--plan", "android", "/data/local/tmp:2"]).expect("config");
        assert_eq!(planned.jobs.len(), 14);
        assert_eq!(planned.jobs[0], ScanJob::new("/", 1));
        assert_eq!(planned.jobs[13], ScanJob::new("/data/local/tmp", 2));
    }

    #[test]
    fn plans_and_sections_combine_without_repeats() {
        let planned = config(&[
            "census",
            "--plan",
            "android",
            "--section",
            "environment_variables",
            "--section",
            "small_files",
        ])
        .expect("config");
        assert_eq!(
            planned.sections,
            vec![SectionKind::SmallFiles, SectionKind::EnvironmentVariables]
        );
    }

    #[test]
    fn a_section_alone_is_enough_to_run() {
        let sections_only = config(&["census", "--plan", "properties"]).expect("config");
        assert!(sections_only.jobs.is_empty());
        assert_eq!(sections_only.sections.len(), 3);

        assert!(matches!(
            config(&["census", "--section", "dmesg"]),
            Err(CliError::UnknownSection(name)) if name == "dmesg"
        ));
    }

    #[test]
    fn defaults_match_documented_behaviour() {
        let defaults = config(&["census", "/etc"]).expect("config");
        assert_eq!(defaults.jobs, vec![ScanJob::new("/etc", DEFAULT_DEPTH)]);
        assert!(defaults.sections.is_empty());
        assert_eq!(defaults.format, OutputFormat::JsonLines);
        assert_eq!(defaults.labels, LabelMode::default());
        assert_eq!(defaults.verbosity, VerbosityConfig::default());
    }

    #[test]
    fn format_and_label_options_are_applied() {
        let disabled = config(&["census", "-f", "json", "--no-labels", "-v", "/"]).expect("config");
        assert_eq!(disabled.format, OutputFormat::Json);
        assert_eq!(disabled.labels, LabelMode::Disabled);
        assert_eq!(disabled.verbosity, VerbosityConfig::from_verbose_level(1));

        let custom = config(&["census", "--label-attr", "user.census", "/"]).expect("config");
        let LabelMode::Probe { config: label_config } = custom.labels else {
            panic!("labels should be probed");
        };
        assert_eq!(label_config.attribute().to_bytes(), b"user.census");
    }

    #[test]
    fn unknown_values_are_reported() {
        assert!(matches!(
            config(&["census", "-f", "xml", "/"]),
            Err(CliError::UnknownFormat(name)) if name == "xml"
        ));
        assert!(matches!(
            config(&["census", "--plan", "ios"]),
            Err(CliError::UnknownPlan(_))
        ));
        assert!(matches!(
            config(&["census", "--label-attr", "", "/"]),
            Err(CliError::LabelAttribute(_))
        ));
    }
}
