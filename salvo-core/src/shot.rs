//! Shot validation.
//!
//! A shot is checked against a snapshot before anything is written, then
//! committed by the storage layer as one transaction that records the shot,
//! promotes both mirrored cells to Hit when a ship is there, and advances the
//! turn tokens. The storage layer repeats the turn and re-fire checks inside
//! that transaction; this module supplies the decision both places share.

use salvo_types::{Board, Cell, CellState, Coord, ShotOutcome, Team, ValidationError};

use crate::turn::TurnState;

/// The cells one shot touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotTarget {
    /// Firing team.
    pub team: Team,
    /// Target coordinate.
    pub coord: Coord,
}

impl ShotTarget {
    /// Create a target.
    pub fn new(team: Team, coord: Coord) -> Self {
        Self { team, coord }
    }

    /// Board the shot is recorded on.
    pub fn shot_board(&self) -> Board {
        Board::shots(self.team)
    }

    /// Board the shot lands on.
    pub fn target_board(&self) -> Board {
        Board::ships(self.team.opponent())
    }
}

/// Check that `team` may fire at `coord`.
///
/// `turn` is the arbitrated state of the same snapshot and `existing_shot` the
/// cell already recorded at `(coord, team's shot board)`, if any.
pub fn validate(
    target: ShotTarget,
    turn: TurnState,
    existing_shot: Option<&Cell>,
) -> Result<(), ValidationError> {
    if !turn.is_started() {
        return Err(ValidationError::GameNotStarted);
    }
    if !turn.can_act(target.team) {
        return Err(ValidationError::NotYourTurn(target.team));
    }
    if existing_shot.is_some() {
        return Err(ValidationError::AlreadyFired {
            team: target.team,
            coord: target.coord,
        });
    }
    Ok(())
}

/// Outcome of a shot given what occupies the target cell.
///
/// Only an intact ship segment turns into a hit. A segment that is already
/// Hit cannot be hit twice because the same team cannot fire at the same
/// coordinate twice.
pub fn resolve(target_cell: Option<CellState>) -> ShotOutcome {
    match target_cell {
        Some(CellState::Ship) => ShotOutcome::Hit,
        _ => ShotOutcome::Miss,
    }
}
