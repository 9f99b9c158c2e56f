use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// High-level error type shared across notekit operations.
#[derive(Debug, Error)]
pub enum NotekitError {
    #[error("fetch error: {0}")]
    Fetch(String),
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("selector error: {0}")]
    Selector(String),
    #[error("missing element: {0}")]
    MissingElement(String),
    #[error("walk error under {root}: {message}")]
    Walk { root: PathBuf, message: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<walkdir::Error> for NotekitError {
    fn from(err: walkdir::Error) -> Self {
        let root = err
            .path()
            .map(|path| path.to_path_buf())
            .unwrap_or_default();
        Self::Walk {
            root,
            message: err.to_string(),
        }
    }
}

impl NotekitError {
    pub fn context<T: fmt::Display>(self, ctx: T) -> Self {
        match self {
            NotekitError::Fetch(msg) => NotekitError::Fetch(format!("{ctx}: {msg}")),
            NotekitError::Selector(msg) => NotekitError::Selector(format!("{ctx}: {msg}")),
            NotekitError::MissingElement(msg) => {
                NotekitError::MissingElement(format!("{ctx}: {msg}"))
            }
            NotekitError::Io(err) => {
                NotekitError::Io(std::io::Error::new(err.kind(), format!("{ctx}: {err}")))
            }
            other => other,
        }
    }
}
