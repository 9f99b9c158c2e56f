use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use notekit::index::{DEFAULT_EXTENSION, DEFAULT_OUTPUT, DEFAULT_ROOT};
use notekit::{IndexConfig, build_index};

use crate::commands::CommandResult;
use crate::error::CliError;
use crate::util::{self, Verbosity};

pub fn command() -> Command {
    Command::new("index")
        .about("Write a flat index of the Markdown notes under a directory")
        .arg(
            Arg::new("root")
                .long("root")
                .value_name("DIR")
                .default_value(DEFAULT_ROOT)
                .value_parser(value_parser!(PathBuf))
                .help("Notes directory to walk."),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .value_name("FILE")
                .default_value(DEFAULT_OUTPUT)
                .value_parser(value_parser!(PathBuf))
                .help("Index file to overwrite."),
        )
        .arg(
            Arg::new("max-depth")
                .long("max-depth")
                .value_name("N")
                .default_value("1")
                .value_parser(value_parser!(usize))
                .help("Deepest directory level listed; the root is level 0."),
        )
        .arg(
            Arg::new("extension")
                .long("extension")
                .value_name("EXT")
                .default_value(DEFAULT_EXTENSION)
                .help("File name suffix an entry must end with."),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Do not print the index contents after writing."),
        )
}

pub fn run(verbosity: Verbosity, matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let defaults = IndexConfig::default();
    let config = IndexConfig {
        root: matches
            .get_one::<PathBuf>("root")
            .cloned()
            .unwrap_or(defaults.root),
        output: matches
            .get_one::<PathBuf>("output")
            .cloned()
            .unwrap_or(defaults.output),
        max_depth: matches
            .get_one::<usize>("max-depth")
            .copied()
            .unwrap_or(defaults.max_depth),
        extension: matches
            .get_one::<String>("extension")
            .cloned()
            .unwrap_or(defaults.extension),
    };
    util::validate_extension(&config.extension)?;

    if verbosity.verbose {
        tracing::info!(
            root = %config.root.display(),
            output = %config.output.display(),
            max_depth = config.max_depth,
            extension = %config.extension,
            "resolved index configuration"
        );
    }

    let report = build_index(&config)?;
    Ok(CommandResult::IndexBuilt {
        report,
        quiet: matches.get_flag("quiet"),
    })
}
