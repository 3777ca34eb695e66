//! Error types for the ledger

use crate::types::UserId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or blank required field
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// User id already registered
    #[error("User with ID {0} already exists")]
    DuplicateUser(UserId),

    /// Payer or split participant is not registered
    #[error("Unknown user: {0}")]
    UnknownUser(UserId),

    /// Declared total disagrees with the sum of the splits
    #[error("Total amount {total} does not match sum of splits {split_sum}")]
    AmountMismatch {
        /// Declared expense total
        total: Decimal,
        /// Sum of all split amounts
        split_sum: Decimal,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Metrics registry error
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable machine-readable code, for transports mapping errors to statuses
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "invalid_input",
            Error::DuplicateUser(_) => "duplicate_user",
            Error::UnknownUser(_) => "unknown_user",
            Error::AmountMismatch { .. } => "amount_mismatch",
            Error::Config(_) => "config",
            Error::Metrics(_) => "metrics",
            Error::Io(_) => "io",
        }
    }

    /// Whether the error was caused by caller input rather than the environment
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput(_)
                | Error::DuplicateUser(_)
                | Error::UnknownUser(_)
                | Error::AmountMismatch { .. }
        )
    }
}
