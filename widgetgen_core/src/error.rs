use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WidgetgenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid path: {path}")]
    InvalidPath { path: PathBuf },

    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    #[error("Manifest error in {file}: {message}")]
    Manifest { file: PathBuf, message: String },

    #[error("Install error: {0}")]
    Install(String),

    #[error("Invalid regex pattern: {0}")]
    Regex(String),
}

impl From<regex::Error> for WidgetgenError {
    fn from(err: regex::Error) -> Self {
        WidgetgenError::Regex(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WidgetgenError>;

impl WidgetgenError {
    pub fn config(message: impl Into<String>) -> Self {
        WidgetgenError::Config(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        WidgetgenError::Validation(message.into())
    }

    pub fn manifest(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        WidgetgenError::Manifest {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn install(message: impl Into<String>) -> Self {
        WidgetgenError::Install(message.into())
    }
}
