use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudySpeakError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF decode failed: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}
