use thiserror::Error;

#[derive(Error, Debug)]
pub enum BolsoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Unknown file: {0}")]
    UnknownFile(String),

    #[error("'{0}' is not an admin")]
    NotAdmin(String),

    #[error("No user logged in")]
    NoSession,

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, BolsoError>;
