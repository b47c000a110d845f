use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClubError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Config parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClubError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ClubError::Io { path: path.into(), source }
    }

    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        ClubError::Json { context: context.into(), source }
    }

    pub fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        ClubError::NotFound { kind, key: key.into() }
    }

    /// Stable error code surfaced through the JSON API.
    pub fn code(&self) -> &'static str {
        match self {
            ClubError::Io { .. } => "IO_ERROR",
            ClubError::Json { .. } => "JSON_ERROR",
            ClubError::Csv { .. } => "CSV_ERROR",
            ClubError::Yaml(_) => "CONFIG_PARSE_ERROR",
            ClubError::NotFound { .. } => "NOT_FOUND",
            ClubError::InvalidConfig(_) => "INVALID_CONFIG",
            ClubError::InvalidRequest(_) => "INVALID_REQUEST",
        }
    }

    /// Whether retrying the same load later could succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ClubError::Io { .. })
    }
}

pub type Result<T> = std::result::Result<T, ClubError>;
