//! Whole-ledger snapshots and their fingerprint.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::CodecError;
use crate::{Cell, Coord, Fingerprint, ShotOutcome, Team, TurnToken};

/// Every cell and token at one committed point in time, in canonical order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    cells: Vec<Cell>,
    tokens: Vec<TurnToken>,
    move_count: u64,
}

impl Snapshot {
    /// Build a snapshot. Input order does not matter.
    pub fn new(mut cells: Vec<Cell>, mut tokens: Vec<TurnToken>, move_count: u64) -> Self {
        cells.sort_by_key(|c| (c.board, c.coord));
        tokens.sort_by_key(|t| t.team);
        Self {
            cells,
            tokens,
            move_count,
        }
    }

    /// Cells ordered by `(board, x, y)`.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Tokens ordered by team.
    pub fn tokens(&self) -> &[TurnToken] {
        &self.tokens
    }

    /// Number of moves recorded so far.
    pub fn move_count(&self) -> u64 {
        self.move_count
    }

    /// Serialize to MessagePack bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        rmp_serde::to_vec(self).map_err(CodecError::Serialization)
    }

    /// SHA-256 over the canonical encoding.
    pub fn fingerprint(&self) -> Result<Fingerprint, CodecError> {
        let mut hasher = Sha256::new();
        hasher.update(b"salvo-snapshot-v1");
        hasher.update(self.to_bytes()?);
        Ok(Fingerprint::from_raw(hasher.finalize().into()))
    }
}

/// Human-readable audit entry written alongside each shot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Store-assigned sequence number, starting at 1.
    pub seq: u64,
    /// Team that fired.
    pub team: Team,
    /// Target.
    pub coord: Coord,
    /// Resolved outcome.
    pub outcome: ShotOutcome,
    /// Free-form description, e.g. `red fired D4: hit`.
    pub note: String,
}

impl MoveRecord {
    /// The note stored for a shot.
    pub fn describe(team: Team, coord: Coord, outcome: ShotOutcome) -> String {
        format!("{team} fired {coord}: {outcome}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Board, CellState};

    fn cell(x: i32, y: i32, board: Board, state: CellState) -> Cell {
        Cell::new(Coord::new(x, y).unwrap(), board, state)
    }

    #[test]
    fn fingerprint_ignores_input_order() {
        let a = cell(1, 1, Board::RedShips, CellState::Ship);
        let b = cell(2, 1, Board::BlueShots, CellState::Miss);
        let red = TurnToken::new(Team::Red, 0.4);
        let blue = TurnToken::new(Team::Blue, 0.6);

        let s1 = Snapshot::new(vec![a, b], vec![red, blue], 0);
        let s2 = Snapshot::new(vec![b, a], vec![blue, red], 0);

        assert_eq!(s1.fingerprint().unwrap(), s2.fingerprint().unwrap());
    }

    #[test]
    fn fingerprint_changes_with_content() {
        let a = cell(1, 1, Board::RedShips, CellState::Ship);
        let hit = cell(1, 1, Board::RedShips, CellState::Hit);
        let tokens = vec![TurnToken::new(Team::Red, 0.9)];

        let before = Snapshot::new(vec![a], tokens.clone(), 0).fingerprint().unwrap();
        let promoted = Snapshot::new(vec![hit], tokens.clone(), 0)
            .fingerprint()
            .unwrap();
        let flipped = Snapshot::new(vec![a], vec![TurnToken::new(Team::Red, 0.1)], 0)
            .fingerprint()
            .unwrap();
        let logged = Snapshot::new(vec![a], tokens, 1).fingerprint().unwrap();

        assert_ne!(before, promoted);
        assert_ne!(before, flipped);
        assert_ne!(before, logged);
    }

    #[test]
    fn empty_snapshot_has_stable_fingerprint() {
        let a = Snapshot::new(vec![], vec![], 0).fingerprint().unwrap();
        let b = Snapshot::new(vec![], vec![], 0).fingerprint().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn move_note_format() {
        let note = MoveRecord::describe(Team::Red, Coord::new(3, 4).unwrap(), ShotOutcome::Hit);
        assert_eq!(note, "red fired D4: hit");
    }

    #[test]
    fn snapshot_serializes_to_json_for_debugging() {
        let s = Snapshot::new(vec![cell(0, 0, Board::RedShips, CellState::Ship)], vec![], 0);
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("RedShips"));
    }
}
