use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use notekit::stubs::{DEFAULT_ANCHOR_CLASS, DEFAULT_BASE_URL, DEFAULT_SITE_ROOT};
use notekit::{
    DEFAULT_TIMEOUT, FailurePolicy, HttpFetcher, StubConfig, generate_stubs,
    generate_stubs_from_html,
};

use crate::commands::CommandResult;
use crate::error::{CliError, ExitStatus};
use crate::util::{self, Verbosity};

pub fn command() -> Command {
    Command::new("stubs")
        .about("Generate one stub note per section link on a course page")
        .arg(
            Arg::new("url")
                .long("url")
                .value_name("URL")
                .default_value(DEFAULT_BASE_URL)
                .help("Course page whose section links become stubs."),
        )
        .arg(
            Arg::new("site-root")
                .long("site-root")
                .value_name("URL")
                .default_value(DEFAULT_SITE_ROOT)
                .help("Site root prepended to each section href."),
        )
        .arg(
            Arg::new("class")
                .long("class")
                .value_name("NAME")
                .default_value(DEFAULT_ANCHOR_CLASS)
                .help("CSS class marking section anchors."),
        )
        .arg(
            Arg::new("out")
                .long("out")
                .value_name("DIR")
                .default_value(".")
                .value_parser(value_parser!(PathBuf))
                .help("Directory the stub files are written to."),
        )
        .arg(
            Arg::new("html")
                .long("html")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Read the page from a saved HTML file instead of fetching --url."),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_name("SECS")
                .value_parser(value_parser!(u64))
                .help("HTTP timeout in seconds (default 30)."),
        )
        .arg(
            Arg::new("keep-going")
                .long("keep-going")
                .action(ArgAction::SetTrue)
                .help("Skip section links that cannot be turned into stubs instead of aborting."),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("List the stubs that would be written without touching disk."),
        )
}

pub fn run(verbosity: Verbosity, matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let config = build_config(matches)?;
    util::validate_http_url(&config.base_url, "--url")?;
    util::validate_http_url(&config.site_root, "--site-root")?;

    if verbosity.verbose {
        tracing::info!(
            url = %config.base_url,
            site_root = %config.site_root,
            class = %config.anchor_class,
            out = %config.output_dir.display(),
            policy = ?config.failure_policy,
            dry_run = config.dry_run,
            "resolved stub configuration"
        );
    }

    let report = match matches.get_one::<PathBuf>("html") {
        Some(path) => {
            let html = fs::read_to_string(path).map_err(|err| {
                CliError::new(
                    format!("failed to read {}: {err}", path.display()),
                    ExitStatus::Io,
                )
            })?;
            generate_stubs_from_html(&html, &config)?
        }
        None => {
            let timeout = matches
                .get_one::<u64>("timeout")
                .map(|secs| Duration::from_secs(*secs))
                .unwrap_or(DEFAULT_TIMEOUT);
            generate_stubs(&HttpFetcher::new(timeout), &config)?
        }
    };

    Ok(CommandResult::StubsGenerated { report })
}

fn build_config(matches: &ArgMatches) -> Result<StubConfig, CliError> {
    let required = |name: &str| {
        matches
            .get_one::<String>(name)
            .cloned()
            .ok_or_else(|| CliError::new(format!("--{name} is required"), ExitStatus::Usage))
    };

    let class = required("class")?;
    if class.trim().is_empty() {
        return Err(CliError::new("--class must not be empty", ExitStatus::Usage));
    }

    Ok(StubConfig {
        base_url: required("url")?,
        site_root: required("site-root")?,
        anchor_class: class,
        output_dir: matches
            .get_one::<PathBuf>("out")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(".")),
        failure_policy: if matches.get_flag("keep-going") {
            FailurePolicy::Continue
        } else {
            FailurePolicy::Abort
        },
        dry_run: matches.get_flag("dry-run"),
    })
}
