use std::process::ExitCode;

fn main() -> ExitCode {
    notekit_cli::run()
}
