use baseline_dialects::DialectError;
use baseline_registry::RegistryError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScanError>;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Dialect(#[from] DialectError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("No dialect parser claims {0}")]
    Unsupported(String),

    #[error("Task failed: {0}")]
    TaskFailed(String),

    #[error("{0}")]
    Other(String),
}

impl ScanError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn unsupported(path: impl Into<String>) -> Self {
        Self::Unsupported(path.into())
    }

    /// Short classification used in scan logs and stats
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::IoError(_) => "io-error",
            Self::Dialect(e) => e.kind(),
            Self::Registry(_) => "registry-error",
            Self::ConfigParse(_) | Self::InvalidConfig(_) => "config-error",
            Self::Unsupported(_) => "unsupported",
            Self::TaskFailed(_) => "task-failed",
            Self::Other(_) => "error",
        }
    }
}

impl From<tokio::task::JoinError> for ScanError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::TaskFailed(e.to_string())
    }
}
