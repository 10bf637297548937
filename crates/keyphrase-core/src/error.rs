use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyphraseError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Keyboard controller error: {0}")]
    Keyboard(String),

    #[error("Database not found at: {0}")]
    DatabaseNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Matcher for '{key}' failed: {message}")]
    Matcher { key: String, message: String },

    #[error("Error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, KeyphraseError>;
