use std::ffi::OsString;
use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::EnvFilter;

use crate::commands;
use crate::error::{CliError, ExitStatus};
use crate::formatter::{OutputFormat, emit_result};
use crate::util::Verbosity;

const NAME: &str = "notekit";

pub fn run() -> ExitCode {
    match run_cli(std::env::args()) {
        Ok(code) => code,
        Err(err) => {
            err.print();
            err.exit_code()
        }
    }
}

/// Parses CLI arguments and dispatches to the matching command. Returns a
/// `sysexits`-compatible `ExitCode`.
pub fn run_cli<I, S>(args: I) -> Result<ExitCode, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let command = build_cli();
    let matches = command.try_get_matches_from(args)?;

    let verbosity = Verbosity {
        json: matches.get_flag("json"),
        verbose: matches.get_flag("verbose"),
    };
    init_tracing(verbosity);
    let output = if verbosity.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let result = dispatch(verbosity, &matches)?;
    emit_result(result, output)
}

// Logs go to stderr so stdout carries only command output.
fn init_tracing(verbosity: Verbosity) {
    let fallback = if verbosity.verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Defines the root `clap::Command` tree: global output flags plus the
/// `stubs` and `index` subcommands.
fn build_cli() -> Command {
    Command::new(NAME)
        .about("Maintain a notes folder: course section stubs and a Markdown index")
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit a JSON object instead of human-readable text."),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log resolved configuration and each step to stderr."),
        )
        .subcommand_required(true)
        .subcommand(commands::stubs::command())
        .subcommand(commands::index::command())
}

fn dispatch(
    verbosity: Verbosity,
    matches: &ArgMatches,
) -> Result<commands::CommandResult, CliError> {
    match matches.subcommand() {
        Some(("stubs", sub)) => {
            commands::stubs::run(verbosity, sub).map_err(|err| err.in_command("stubs"))
        }
        Some(("index", sub)) => {
            commands::index::run(verbosity, sub).map_err(|err| err.in_command("index"))
        }
        _ => Err(CliError::new("missing command", ExitStatus::Usage)),
    }
}
