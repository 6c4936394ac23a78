//! # salvo-types
//!
//! Ledger vocabulary for salvo, a two-party Battleship game coordinated
//! entirely through a shared record store.
//!
//! This crate provides the foundational types used across all salvo crates:
//! - [`Team`], [`Board`], [`CellState`], [`Coord`], [`Cell`] - The cell ledger
//! - [`TurnToken`] - Per-team floating priority used for turn arbitration
//! - [`Snapshot`], [`Fingerprint`] - Whole-ledger content and its digest
//! - [`GameId`] - Identity of one game (one shared database)
//! - [`ValidationError`], [`CodecError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod board;
mod error;
mod ids;
mod snapshot;

pub use board::{
    Board, Cell, CellState, Coord, Orientation, ShotOutcome, Team, TurnToken, BOARD_SIZE,
};
pub use error::{CodecError, ValidationError};
pub use ids::{Fingerprint, GameId};
pub use snapshot::{MoveRecord, Snapshot};
