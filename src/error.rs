use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV encoding error: {0}")]
    Csv(#[from] csv::Error),
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("OMDB_API_KEY is not configured")]
    MissingApiKey,

    #[error("movie {0} not found")]
    NotFound(String),

    #[error("server responded with status code {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Malformed(String),
}

impl LookupError {
    /// Connection, DNS and timeout failures. These are the only retried ones.
    pub fn is_transport(&self) -> bool {
        matches!(self, LookupError::Transport(_))
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("template file not found: {0}")]
    TemplateNotFound(PathBuf),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("console error: {0}")]
    Console(#[from] std::io::Error),
}

/// Failures that stop the program.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("could not set up the movie lookup: {0}")]
    Lookup(#[from] LookupError),

    #[error("console error: {0}")]
    Console(#[from] std::io::Error),
}
