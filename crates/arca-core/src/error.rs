use thiserror::Error;

pub type Result<T> = std::result::Result<T, ArcaError>;

#[derive(Debug, Error)]
pub enum ArcaError {
    #[error("remote call failed: {0}")]
    Remote(String),

    #[error("malformed server response: {0}")]
    BadResponse(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
