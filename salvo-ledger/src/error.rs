//! Error types for salvo-ledger.

use std::path::PathBuf;

use salvo_types::{Board, CodecError, Coord, Team, ValidationError};

/// Ledger operation errors.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The store could not be reached or failed mid-operation.
    ///
    /// Fatal to the calling process: never retried by the engine.
    #[error("store unavailable during {context}: {source}")]
    Unavailable {
        /// Operation that was running.
        context: &'static str,
        /// Underlying database error.
        #[source]
        source: sqlx::Error,
    },

    /// A write collided with an existing record.
    #[error("cell already recorded: {board} {coord}")]
    Conflict {
        /// Board of the colliding key.
        board: Board,
        /// Coordinate of the colliding key.
        coord: Coord,
    },

    /// The team's turn token already exists.
    #[error("{0} has already flipped a coin")]
    TokenExists(Team),

    /// A guard re-checked inside the transaction refused the write.
    #[error(transparent)]
    Rejected(#[from] ValidationError),

    /// A stored row could not be decoded.
    #[error("corrupt ledger row: {0}")]
    Corrupt(#[from] CodecError),

    /// Database path error.
    #[error("invalid database path: {path}")]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
    },
}

impl LedgerError {
    /// Wrap a database error with the operation that produced it.
    pub fn unavailable(context: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| LedgerError::Unavailable { context, source }
    }

    /// Whether this error means the store itself is unusable.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            LedgerError::Unavailable { .. } | LedgerError::InvalidPath { .. }
        )
    }
}

/// Whether a database error is a primary-key or unique-constraint collision.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => {
            db.is_unique_violation() || db.message().contains("UNIQUE constraint failed")
        }
        _ => false,
    }
}

/// Result type alias for ledger operations.
pub type LedgerResult<T> = std::result::Result<T, LedgerError>;
