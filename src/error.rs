use std::path::PathBuf;

use thiserror::Error;

pub use anyhow::Context;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Cannot find {}", path.display())]
    MissingFile { path: PathBuf },
    #[error("{0}")]
    InvalidSelection(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Calamine(#[from] calamine::Error),
    #[error(transparent)]
    Notify(#[from] notify::Error),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn message<T: Into<String>>(msg: T) -> Self {
        AppError::Message(msg.into())
    }

    pub fn missing_file<P: Into<PathBuf>>(path: P) -> Self {
        AppError::MissingFile { path: path.into() }
    }

    pub fn invalid_selection<T: Into<String>>(msg: T) -> Self {
        AppError::InvalidSelection(msg.into())
    }

    /// Errors the UI reports inline and recovers from.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            AppError::MissingFile { .. } | AppError::InvalidSelection(_)
        )
    }
}
