// rex-core/src/error.rs

use thiserror::Error;

use rex_shared_types::{AddressError, AmountError};

/// Structural faults. Any of these aborts the event being processed; nothing
/// from that event is committed.
#[derive(Debug, PartialEq, Eq, Error, Clone)]
pub enum LedgerError {
    #[error("Store error: {0}")]
    Store(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Malformed event: {0}")]
    MalformedEvent(String),
    #[error("Invalid address: {0}")]
    InvalidAddress(#[from] AddressError),
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),
    #[error("The zero address cannot be loaded as an account")]
    NullAddress,
    #[error("Arithmetic overflow: {0}")]
    Overflow(String),
    #[error("Unknown contract {0}")]
    UnknownContract(String),
    #[error("Other ledger error: {0}")]
    Other(String),
}

impl From<Box<bincode::ErrorKind>> for LedgerError {
    fn from(err: Box<bincode::ErrorKind>) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}

pub type Result<T, E = LedgerError> = std::result::Result<T, E>;
