use thiserror::Error;

#[derive(Error, Debug)]
pub enum UtaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not a Bybit AssetChangeDetails (UTA) export: {0}")]
    InvalidFileName(String),

    #[error("None of the given files could be loaded")]
    NoUsableFiles,

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, UtaError>;
