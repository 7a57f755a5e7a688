use std::path::PathBuf;
use thiserror::Error;

/// Application-level errors shown in the status line
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing API setting: {0}")]
    MissingSetting(&'static str),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported upload type: {0}")]
    UnsupportedUpload(PathBuf),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("image generation API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("unexpected API response: {0}")]
    Response(String),

    #[error("image could not be decoded: {0}")]
    Image(#[from] image::ImageError),

    #[error("task join error: {0}")]
    Join(String),
}

impl AppError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
