//! Engine errors.
//!
//! Every failure a session reports falls into one of three kinds: the move
//! was invalid, the write collided with something already recorded, or the
//! store itself could not be used. Only the last one is fatal.

use salvo_ledger::LedgerError;
use salvo_types::ValidationError;
use thiserror::Error;

/// Session errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The move was rejected. Recoverable: report it and keep playing.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The write collided with an existing record.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The store could not be read or written. Fatal.
    #[error(transparent)]
    StoreUnavailable(LedgerError),
}

impl EngineError {
    /// Whether the calling process should stop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::StoreUnavailable(_))
    }
}

impl From<LedgerError> for EngineError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Rejected(e) => EngineError::Validation(e),
            LedgerError::Conflict { .. } | LedgerError::TokenExists(_) => {
                EngineError::Conflict(err.to_string())
            }
            // A row the engine cannot decode is as unusable as a dead store.
            LedgerError::Unavailable { .. }
            | LedgerError::Corrupt(_)
            | LedgerError::InvalidPath { .. } => EngineError::StoreUnavailable(err),
        }
    }
}

/// Result type alias for session operations.
pub type EngineResult<T> = std::result::Result<T, EngineError>;
