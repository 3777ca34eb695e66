//! Error types for settlement engine

use thiserror::Error;

/// Result type for settlement operations
pub type Result<T> = std::result::Result<T, Error>;

/// Settlement errors
#[derive(Error, Debug)]
pub enum Error {
    /// Ledger error (validation rejections included)
    #[error(transparent)]
    Ledger(#[from] splitledger_core::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Error::Ledger(err) => err.code(),
            Error::Config(_) => "config",
            Error::Serialization(_) => "serialization",
            Error::Io(_) => "io",
        }
    }

    /// The underlying ledger rejection, if this is one
    pub fn as_rejection(&self) -> Option<&splitledger_core::Error> {
        match self {
            Error::Ledger(err) if err.is_rejection() => Some(err),
            _ => None,
        }
    }
}
