use thiserror::Error;

pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Registry JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid registry document: {0}")]
    InvalidDocument(String),

    #[error("Invalid feature record: {0}")]
    InvalidFeature(String),
}
