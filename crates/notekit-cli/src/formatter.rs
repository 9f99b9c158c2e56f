use std::process::ExitCode;

use crate::commands::CommandResult;
use crate::error::CliError;

pub enum OutputFormat {
    Text,
    Json,
}

/// Renders a `CommandResult` as text or a single JSON object and converts the
/// outcome into an exit code.
pub fn emit_result(result: CommandResult, format: OutputFormat) -> Result<ExitCode, CliError> {
    match format {
        OutputFormat::Text => print_text(&result),
        OutputFormat::Json => print_json(&result)?,
    };
    Ok(ExitCode::from(result.exit_status().code()))
}

fn print_text(result: &CommandResult) {
    match result {
        CommandResult::StubsGenerated { report } => {
            if report.dry_run {
                println!(
                    "Dry run: would write {} stub(s) to {}",
                    report.stubs.len(),
                    report.output_dir
                );
            } else {
                println!(
                    "Wrote {} stub(s) to {}",
                    report.stubs.len(),
                    report.output_dir
                );
            }
            for stub in &report.stubs {
                println!("  - {} -> {}", stub.file_name, stub.url);
            }
            for skipped in &report.skipped {
                println!("  ! link #{} skipped: {}", skipped.index + 1, skipped.reason);
            }
        }
        CommandResult::IndexBuilt { report, quiet } => {
            if !*quiet {
                // Printed exactly as written so the output can be piped.
                print!("{}", report.contents);
            }
        }
    }
}

fn print_json(result: &CommandResult) -> Result<(), CliError> {
    let payload = serde_json::to_string(result)?;
    println!("{payload}");
    Ok(())
}
