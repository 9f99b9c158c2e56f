use std::fmt;
use std::process::ExitCode;

use clap::error::ErrorKind as ClapErrorKind;
use notekit::NotekitError;

const EX_OK: u8 = 0;
const EX_USAGE: u8 = 64;
const EX_DATAERR: u8 = 65;
const EX_UNAVAILABLE: u8 = 69;
const EX_SOFTWARE: u8 = 70;
const EX_OSERR: u8 = 71;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Ok,
    Usage,
    Data,
    Unavailable,
    Software,
    Io,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Ok => EX_OK,
            ExitStatus::Usage => EX_USAGE,
            ExitStatus::Data => EX_DATAERR,
            ExitStatus::Unavailable => EX_UNAVAILABLE,
            ExitStatus::Software => EX_SOFTWARE,
            ExitStatus::Io => EX_OSERR,
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    message: String,
    status: ExitStatus,
}

impl CliError {
    pub fn new(message: impl Into<String>, status: ExitStatus) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    pub fn status(&self) -> ExitStatus {
        self.status
    }

    /// Prefixes the message with the subcommand that produced it, e.g.
    /// `index: io error: ...`. Empty messages (help output) stay empty.
    pub fn in_command(self, command: &str) -> Self {
        if self.message.is_empty() {
            return self;
        }
        Self {
            message: format!("{command}: {}", self.message),
            status: self.status,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.status.code())
    }

    pub fn print(&self) {
        if !self.message.is_empty() {
            eprintln!("{}", self.message);
        }
    }
}

impl From<NotekitError> for CliError {
    fn from(err: NotekitError) -> Self {
        let status = match &err {
            NotekitError::Fetch(_) => ExitStatus::Unavailable,
            NotekitError::InvalidUrl { .. } | NotekitError::Selector(_) => ExitStatus::Usage,
            NotekitError::MissingElement(_) => ExitStatus::Data,
            NotekitError::Walk { .. } | NotekitError::Io(_) => ExitStatus::Io,
        };
        CliError::new(err.to_string(), status)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::new(
            format!("failed to serialize result: {err}"),
            ExitStatus::Software,
        )
    }
}

impl From<clap::Error> for CliError {
    fn from(err: clap::Error) -> Self {
        let status = match err.kind() {
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => ExitStatus::Ok,
            _ => ExitStatus::Usage,
        };
        if status == ExitStatus::Ok {
            let _ = err.print();
            CliError::new(String::new(), status)
        } else {
            CliError::new(err.to_string(), status)
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::new(err.to_string(), ExitStatus::Io)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_failures_map_to_unavailable() {
        let err = CliError::from(NotekitError::Fetch("connection refused".into()));
        assert_eq!(err.status(), ExitStatus::Unavailable);
        assert_eq!(err.status().code(), 69);
    }

    #[test]
    fn in_command_prefixes_message_and_keeps_status() {
        let err = CliError::from(NotekitError::MissingElement("no <p> label".into()))
            .in_command("stubs");
        assert_eq!(err.to_string(), "stubs: missing element: no <p> label");
        assert_eq!(err.status(), ExitStatus::Data);

        let silent = CliError::new(String::new(), ExitStatus::Ok).in_command("index");
        assert_eq!(silent.to_string(), "");
    }

    #[test]
    fn missing_structure_maps_to_data() {
        let err = CliError::from(NotekitError::MissingElement("no <p> label".into()));
        assert_eq!(err.status(), ExitStatus::Data);
        assert!(err.to_string().contains("no <p> label"));
    }
}
