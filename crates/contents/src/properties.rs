use std::env;
use std::process::Command;

use logging::trace_contents;

use crate::Section;
use crate::error::ContentsError;

/// Android tool that prints system properties.
pub const GETPROP: &str = "getprop";

/// Environment of the census process, decoded lossily.
#[must_use]
pub fn environment_variables() -> Section {
    env::vars_os()
        .map(|(name, value)| {
            (
                name.to_string_lossy().into_owned(),
                value.to_string_lossy().into_owned(),
            )
        })
        .collect()
}

/// Runs `program` and parses its `[name]: [value]` listing.
///
/// # Errors
///
/// Fails when the program cannot be started or exits unsuccessfully.
pub fn system_properties(program: &str) -> Result<Section, ContentsError> {
    let output = Command::new(program)
        .output()
        .map_err(|source| ContentsError::Spawn {
            program: program.to_owned(),
            source,
        })?;
    if !output.status.success() {
        return Err(ContentsError::Status {
            program: program.to_owned(),
            status: output.status,
        });
    }
    let listing = String::from_utf8_lossy(&output.stdout);
    let properties = parse_properties(&listing);
    trace_contents!("{} reported {} properties", program, properties.len());
    Ok(properties)
}

/// Parses `getprop` output.
///
/// Each line has the form `[name]: [value]`. Lines that do not match, or
/// whose name or value is empty, are ignored. A later duplicate replaces an
/// earlier one.
#[must_use]
pub fn parse_properties(listing: &str) -> Section {
    listing
        .lines()
        .filter_map(|line| {
            let inner = line.strip_prefix('[')?.strip_suffix(']')?;
            let (name, value) = inner.rsplit_once("]: [")?;
            if name.is_empty() || value.is_empty() {
                None
            } else {
                Some((name.to_owned(), value.to_owned()))
            }
        })
        .collect()
}
