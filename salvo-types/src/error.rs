//! Error types for salvo.

use thiserror::Error;

use crate::{Board, Coord, Orientation, Team};

/// A rejected request. Always recoverable: the caller reports it and carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Ships may only be placed on a ship board.
    #[error("invalid board for ship placement: {0}")]
    NotAShipBoard(Board),

    /// Coordinates outside the 10x10 grid.
    #[error("coordinates out of bounds: ({x}, {y})")]
    OutOfBounds {
        /// Column index as given.
        x: i32,
        /// Row index as given.
        y: i32,
    },

    /// Ship length outside 2..=5.
    #[error("invalid ship length: {0}")]
    InvalidLength(i32),

    /// Ship extends past the board edge.
    #[error("ship of length {length} does not fit at {origin} ({orientation})")]
    DoesNotFit {
        /// First segment.
        origin: Coord,
        /// Requested length.
        length: u8,
        /// Requested orientation.
        orientation: Orientation,
    },

    /// A session may only place ships on its own team's board.
    #[error("{team} cannot place ships on {board}")]
    NotYourBoard {
        /// Placing team.
        team: Team,
        /// Requested board.
        board: Board,
    },

    /// Both coin flips are in; fleets are fixed.
    #[error("fleet placement is closed once the game has started")]
    PlacementClosed,

    /// Coordinate text is not letter+digit (`A`-`J`, `0`-`9`).
    #[error("invalid coordinate: {0:?} (expected A-J followed by 0-9, e.g. D4)")]
    InvalidCoordinate(String),

    /// Orientation text is not recognised.
    #[error("invalid orientation: {0:?} (expected h or v)")]
    InvalidOrientation(String),

    /// Team text is not recognised.
    #[error("invalid team: {0:?} (expected red or blue)")]
    InvalidTeam(String),

    /// Game identifiers become database names and are restricted.
    #[error("invalid game id: {0:?}")]
    InvalidGameId(String),

    /// Fewer than two turn tokens exist; nobody may act yet.
    #[error("game not started: waiting for both coin flips")]
    GameNotStarted,

    /// The other team holds the turn.
    #[error("not {0}'s turn")]
    NotYourTurn(Team),

    /// This team already fired at this coordinate.
    #[error("{team} already fired at {coord}")]
    AlreadyFired {
        /// Firing team.
        team: Team,
        /// Target coordinate.
        coord: Coord,
    },
}

/// Encoding and decoding failures for persisted values.
#[derive(Debug, Error)]
pub enum CodecError {
    /// MessagePack serialization failed
    #[error("serialization failed: {0}")]
    Serialization(#[source] rmp_serde::encode::Error),

    /// A persisted enum column held an unexpected value.
    #[error("unknown {kind} value: {value:?}")]
    UnknownValue {
        /// Which column type was being decoded.
        kind: &'static str,
        /// The raw value.
        value: String,
    },

    /// A persisted coordinate was outside the grid.
    #[error("stored coordinate out of range: ({x}, {y})")]
    CoordinateOutOfRange {
        /// Stored column.
        x: i64,
        /// Stored row.
        y: i64,
    },
}
