use crate::error::{CliError, ExitStatus};

#[derive(Clone, Copy, Debug, Default)]
pub struct Verbosity {
    pub json: bool,
    pub verbose: bool,
}

pub fn validate_http_url(value: &str, field: &str) -> Result<(), CliError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CliError::new(
            format!("{field} must not be empty"),
            ExitStatus::Usage,
        ));
    }

    let url = notekit::parse_url(trimmed)
        .map_err(|err| CliError::new(format!("{field}: {err}"), ExitStatus::Usage))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(CliError::new(
            format!("{field} '{trimmed}' must use http or https"),
            ExitStatus::Usage,
        ));
    }

    Ok(())
}

pub fn validate_extension(value: &str) -> Result<(), CliError> {
    if value.is_empty() {
        return Err(CliError::new(
            "extension must not be empty",
            ExitStatus::Usage,
        ));
    }
    if value.contains('/') || value.contains('\\') {
        return Err(CliError::new(
            format!("extension '{value}' must not contain path separators"),
            ExitStatus::Usage,
        ));
    }
    Ok(())
}
