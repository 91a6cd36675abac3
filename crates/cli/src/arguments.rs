use std::ffi::OsString;

use clap::{Arg, ArgAction, Command, builder::OsStringValueParser};

/// Program name used when the caller supplies no `argv[0]`.
pub(crate) const PROGRAM_NAME: &str = "census";

/// Raw command-line values before validation.
///
/// Everything is kept as [`OsString`] so paths that are not valid UTF-8 reach
/// the walker untouched; [`crate::CensusConfig::from_parsed`] does the
/// interpretation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedArgs {
    /// `-h` / `--help` was given.
    pub show_help: bool,
    /// `-V` / `--version` was given.
    pub show_version: bool,
    /// Value of `-d` / `--depth`.
    pub depth: Option<OsString>,
    /// Values of `--plan`, in command-line order.
    pub plans: Vec<OsString>,
    /// Values of `--section`, in command-line order.
    pub sections: Vec<OsString>,
    /// Value of `-f` / `--format`.
    pub format: Option<OsString>,
    /// Value of `--label-attr`.
    pub label_attribute: Option<OsString>,
    /// `--no-labels` was given.
    pub no_labels: bool,
    /// Number of `-v` flags.
    pub verbose: u8,
    /// `-q` / `--quiet` was given.
    pub quiet: bool,
    /// `ROOT[:DEPTH]` operands in command-line order.
    pub roots: Vec<OsString>,
}

/// Builds the `clap` command used for parsing.
fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg_required_else_help(false)
        .arg(
            Arg::new("help")
                .long("help")
                .short('h')
                .help("Show this help message and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .short('V')
                .help("Output version information and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("depth")
                .long("depth")
                .short('d')
                .value_name("N")
                .help("Default depth for roots given without ':DEPTH'.")
                .num_args(1)
                .value_parser(OsStringValueParser::new()),
        )
        .arg(
            Arg::new("plan")
                .long("plan")
                .value_name("NAME")
                .help("Run a built-in census plan before explicit roots; may be repeated.")
                .num_args(1)
                .action(ArgAction::Append)
                .value_parser(OsStringValueParser::new()),
        )
        .arg(
            Arg::new("section")
                .long("section")
                .value_name("NAME")
                .help("Collect a named section after the records; may be repeated.")
                .num_args(1)
                .action(ArgAction::Append)
                .value_parser(OsStringValueParser::new()),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .value_name("FORMAT")
                .help("Output format: json, jsonl or text.")
                .num_args(1)
                .value_parser(OsStringValueParser::new()),
        )
        .arg(
            Arg::new("label-attr")
                .long("label-attr")
                .value_name("NAME")
                .help("Extended attribute holding the security label.")
                .num_args(1)
                .value_parser(OsStringValueParser::new()),
        )
        .arg(
            Arg::new("no-labels")
                .long("no-labels")
                .help("Skip security label lookups entirely.")
                .action(ArgAction::SetTrue)
                .conflicts_with("label-attr"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase log verbosity; may be repeated.")
                .action(ArgAction::Count)
                .conflicts_with("quiet"),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Only log warnings and errors.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("roots")
                .value_name("ROOT[:DEPTH]")
                .num_args(0..)
                .action(ArgAction::Append)
                .value_parser(OsStringValueParser::new()),
        )
}

/// Parses command-line arguments into a [`ParsedArgs`] structure.
///
/// # Errors
///
/// Returns the `clap` error for unknown options, missing option values and
/// conflicting flags.
pub fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();

    if args.is_empty() {
        args.push(OsString::from(PROGRAM_NAME));
    }

    let mut matches = clap_command().try_get_matches_from(args)?;

    let show_help = matches.get_flag("help");
    let show_version = matches.get_flag("version");
    let no_labels = matches.get_flag("no-labels");
    let quiet = matches.get_flag("quiet");
    let verbose = matches.get_count("verbose");
    let depth = matches.remove_one::<OsString>("depth");
    let plans = take_many(&mut matches, "plan");
    let sections = take_many(&mut matches, "section");
    let format = matches.remove_one::<OsString>("format");
    let label_attribute = matches.remove_one::<OsString>("label-attr");
    let roots = take_many(&mut matches, "roots");

    Ok(ParsedArgs {
        show_help,
        show_version,
        depth,
        plans,
        sections,
        format,
        label_attribute,
        no_labels,
        verbose,
        quiet,
        roots,
    })
}

fn take_many(matches: &mut clap::ArgMatches, id: &str) -> Vec<OsString> {
    matches
        .remove_many::<OsString>(id)
        .map(|values| values.collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_empty() {
        let parsed = parse_args(["census"]).expect("parse");
        assert_eq!(parsed, ParsedArgs::default());
    }

    #[test]
    fn empty_argument_list_is_accepted() {
        let parsed = parse_args(Vec::<OsString>::new()).expect("parse");
        assert!(parsed.roots.is_empty());
    }

    #[test]
    fn options_and_operands_are_collected_in_order() {
        let parsed = parse_args([
            "census", "-vv", "-d", "4", "--format", "text", "/etc", "/proc:1",
        ])
        .expect("parse");

        assert_eq!(parsed.verbose, 2);
        assert_eq!(parsed.depth, Some(OsString::from("4")));
        assert_eq!(parsed.format, Some(OsString::from("text")));
        assert_eq!(
            parsed.roots,
            vec![OsString::from("/etc"), OsString::from("/proc:1")]
        );
    }

    #[test]
    fn plans_and_sections_repeat() {
        let parsed = parse_args([
            "census",
            "--plan",
            "android",
            "--section",
            "sysctl",
            "--plan=properties",
        ])
        .expect("parse");

        assert_eq!(
            parsed.plans,
            vec![OsString::from("android"), OsString::from("properties")]
        );
        assert_eq!(parsed.sections, vec![OsString::from("sysctl")]);
    }

    #[test]
    fn no_labels_conflicts_with_label_attr() {
        let error = parse_args(["census", "--no-labels", "--label-attr", "user.x", "/"])
            .expect_err("conflict");
        assert_eq!(error.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn unknown_option_is_rejected() {
        let error = parse_args(["census", "--follow"]).expect_err("unknown");
        assert_eq!(error.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}
