//! Storage layer for salvo-ledger.
//!
//! The shared store is consumed through the narrow [`Ledger`] contract:
//! reads, grouped atomic writes, and a whole-content fingerprint. Nothing
//! above this trait holds an authoritative copy of the game; every decision
//! is made against the latest committed snapshot.

mod sqlite;

pub use sqlite::SqliteLedger;

use crate::error::{LedgerError, LedgerResult};
use async_trait::async_trait;
use salvo_core::{ShipPlacement, ShotTarget};
use salvo_types::{
    Board, Cell, Coord, Fingerprint, MoveRecord, ShotOutcome, Snapshot, TurnToken,
};

/// Trait for shared game stores.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Create the game tables if they do not exist.
    async fn migrate(&self) -> LedgerResult<()>;

    /// Names of the tables in the store.
    async fn tables(&self) -> LedgerResult<Vec<String>>;

    /// Every cell on every board.
    async fn cells(&self) -> LedgerResult<Vec<Cell>>;

    /// The cell at `(coord, board)`, if one has been recorded.
    async fn cell(&self, board: Board, coord: Coord) -> LedgerResult<Option<Cell>>;

    /// All turn tokens (zero, one, or two).
    async fn tokens(&self) -> LedgerResult<Vec<TurnToken>>;

    /// The audit log, oldest first.
    async fn moves(&self) -> LedgerResult<Vec<MoveRecord>>;

    /// Cells, tokens and move count read from one consistent point in time.
    async fn snapshot(&self) -> LedgerResult<Snapshot>;

    /// Fingerprint of the current content.
    async fn fingerprint(&self) -> LedgerResult<Fingerprint> {
        let snapshot = self.snapshot().await?;
        snapshot.fingerprint().map_err(LedgerError::Corrupt)
    }

    /// Write every segment of one validated ship in a single transaction.
    ///
    /// Any collision rolls back the whole ship and returns
    /// [`LedgerError::Conflict`]. Once both teams have flipped, fleets are
    /// fixed and the write is rejected with
    /// [`ValidationError::PlacementClosed`](salvo_types::ValidationError::PlacementClosed).
    async fn place_segments(&self, placement: &ShipPlacement) -> LedgerResult<()>;

    /// Record a team's coin flip. Each team flips exactly once.
    async fn insert_token(&self, token: TurnToken) -> LedgerResult<()>;

    /// Record a shot, promote hit cells, advance the turn and log the move,
    /// all in one transaction.
    ///
    /// Re-checks the turn and re-fire guards inside the transaction and
    /// returns [`LedgerError::Rejected`] if either fails.
    async fn commit_shot(&self, target: ShotTarget) -> LedgerResult<ShotOutcome>;
}
