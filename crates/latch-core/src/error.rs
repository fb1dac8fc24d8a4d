use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid tag identifier: {0}")]
    InvalidTagIdentifier(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
