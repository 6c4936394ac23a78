//! Cell ledger vocabulary.
//!
//! Every fact about a game is a [`Cell`] keyed by `(x, y, board)`. There are
//! four logical boards: each team's ship layout and each team's fired shots.
//! The persisted spellings (`red_ships`, `S`, `red`, ...) are part of the
//! shared schema and must not change.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CodecError, ValidationError};

/// Width and height of every board.
pub const BOARD_SIZE: u8 = 10;

/// One of the two participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Team {
    /// Red side. Wins priority ties.
    Red,
    /// Blue side.
    Blue,
}

impl Team {
    /// Both teams, red first.
    pub const ALL: [Team; 2] = [Team::Red, Team::Blue];

    /// The other team.
    pub fn opponent(self) -> Self {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    /// Persisted spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Team::Red => "red",
            Team::Blue => "blue",
        }
    }

    /// Decode the persisted spelling.
    pub fn from_stored(value: &str) -> Result<Self, CodecError> {
        match value {
            "red" => Ok(Team::Red),
            "blue" => Ok(Team::Blue),
            other => Err(CodecError::UnknownValue {
                kind: "team",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Team {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" => Ok(Team::Red),
            "blue" => Ok(Team::Blue),
            _ => Err(ValidationError::InvalidTeam(s.to_string())),
        }
    }
}

/// One of the four logical grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Board {
    /// Red's ship layout (and hits against it).
    RedShips,
    /// Blue's ship layout (and hits against it).
    BlueShips,
    /// Shots fired by red.
    RedShots,
    /// Shots fired by blue.
    BlueShots,
}

impl Board {
    /// All boards in persisted order.
    pub const ALL: [Board; 4] = [
        Board::RedShips,
        Board::BlueShips,
        Board::RedShots,
        Board::BlueShots,
    ];

    /// The ship board owned by `team`.
    pub fn ships(team: Team) -> Self {
        match team {
            Team::Red => Board::RedShips,
            Team::Blue => Board::BlueShips,
        }
    }

    /// The shot board owned by `team`.
    pub fn shots(team: Team) -> Self {
        match team {
            Team::Red => Board::RedShots,
            Team::Blue => Board::BlueShots,
        }
    }

    /// Team that owns this board.
    pub fn team(self) -> Team {
        match self {
            Board::RedShips | Board::RedShots => Team::Red,
            Board::BlueShips | Board::BlueShots => Team::Blue,
        }
    }

    /// Whether this board holds a ship layout.
    pub fn is_ship_board(self) -> bool {
        matches!(self, Board::RedShips | Board::BlueShips)
    }

    /// Persisted spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Board::RedShips => "red_ships",
            Board::BlueShips => "blue_ships",
            Board::RedShots => "red_shots",
            Board::BlueShots => "blue_shots",
        }
    }

    /// Decode the persisted spelling.
    pub fn from_stored(value: &str) -> Result<Self, CodecError> {
        Board::ALL
            .into_iter()
            .find(|b| b.as_str() == value)
            .ok_or_else(|| CodecError::UnknownValue {
                kind: "board",
                value: value.to_string(),
            })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recorded fact at one coordinate of one board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// Intact ship segment.
    Ship,
    /// Shot that landed on a ship.
    Hit,
    /// Shot that found open water.
    Miss,
}

impl CellState {
    /// Persisted single-letter code.
    pub fn code(self) -> &'static str {
        match self {
            CellState::Ship => "S",
            CellState::Hit => "H",
            CellState::Miss => "M",
        }
    }

    /// Decode the persisted code.
    pub fn from_code(value: &str) -> Result<Self, CodecError> {
        match value {
            "S" => Ok(CellState::Ship),
            "H" => Ok(CellState::Hit),
            "M" => Ok(CellState::Miss),
            other => Err(CodecError::UnknownValue {
                kind: "state",
                value: other.to_string(),
            }),
        }
    }

    /// Hit or Miss.
    pub fn is_shot_marker(self) -> bool {
        matches!(self, CellState::Hit | CellState::Miss)
    }
}

/// Ship orientation. Horizontal grows along x, vertical along y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Segments at `(x + i, y)`.
    Horizontal,
    /// Segments at `(x, y + i)`.
    Vertical,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Horizontal => f.write_str("horizontal"),
            Orientation::Vertical => f.write_str("vertical"),
        }
    }
}

impl FromStr for Orientation {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "h" | "horizontal" => Ok(Orientation::Horizontal),
            "v" | "vertical" => Ok(Orientation::Vertical),
            _ => Err(ValidationError::InvalidOrientation(s.to_string())),
        }
    }
}

/// A position on the grid.
///
/// Internally an integer pair; the letter+digit form (`A`-`J` column,
/// `0`-`9` row) exists only for parsing and display.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    x: u8,
    y: u8,
}

impl Coord {
    /// Create a coordinate, rejecting anything outside `[0, 9]`.
    pub fn new(x: i32, y: i32) -> Result<Self, ValidationError> {
        let max = i32::from(BOARD_SIZE) - 1;
        if !(0..=max).contains(&x) || !(0..=max).contains(&y) {
            return Err(ValidationError::OutOfBounds { x, y });
        }
        Ok(Self {
            x: x as u8,
            y: y as u8,
        })
    }

    /// Decode a stored `(x, y)` pair.
    pub fn from_stored(x: i64, y: i64) -> Result<Self, CodecError> {
        match (i32::try_from(x), i32::try_from(y)) {
            (Ok(cx), Ok(cy)) => {
                Self::new(cx, cy).map_err(|_| CodecError::CoordinateOutOfRange { x, y })
            }
            _ => Err(CodecError::CoordinateOutOfRange { x, y }),
        }
    }

    /// Column index.
    pub fn x(&self) -> u8 {
        self.x
    }

    /// Row index.
    pub fn y(&self) -> u8 {
        self.y
    }

    /// Every coordinate on the board, row by row.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..BOARD_SIZE).flat_map(|y| (0..BOARD_SIZE).map(move |x| Coord { x, y }))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'A' + self.x) as char, self.y)
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coord({}, {})", self.x, self.y)
    }
}

impl FromStr for Coord {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidCoordinate(s.to_string());
        let mut chars = s.trim().chars();
        let (Some(col), Some(row), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(invalid());
        };
        let col = col.to_ascii_uppercase();
        if !('A'..='J').contains(&col) {
            return Err(invalid());
        }
        let row = row.to_digit(10).ok_or_else(invalid)?;
        Coord::new(i32::from(col as u8 - b'A'), row as i32)
    }
}

/// One ledger record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Position on the board.
    pub coord: Coord,
    /// Which board this fact belongs to.
    pub board: Board,
    /// The fact.
    pub state: CellState,
}

impl Cell {
    /// Create a cell.
    pub fn new(coord: Coord, board: Board, state: CellState) -> Self {
        Self {
            coord,
            board,
            state,
        }
    }
}

/// Resolved result of one shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShotOutcome {
    /// The shot landed on a ship segment.
    Hit,
    /// Open water.
    Miss,
}

impl ShotOutcome {
    /// Persisted spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            ShotOutcome::Hit => "hit",
            ShotOutcome::Miss => "miss",
        }
    }

    /// Decode the persisted spelling.
    pub fn from_stored(value: &str) -> Result<Self, CodecError> {
        match value {
            "hit" => Ok(ShotOutcome::Hit),
            "miss" => Ok(ShotOutcome::Miss),
            other => Err(CodecError::UnknownValue {
                kind: "outcome",
                value: other.to_string(),
            }),
        }
    }

    /// The cell state recorded on the shot board for this outcome.
    pub fn cell_state(self) -> CellState {
        match self {
            ShotOutcome::Hit => CellState::Hit,
            ShotOutcome::Miss => CellState::Miss,
        }
    }
}

impl fmt::Display for ShotOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-team turn priority. The team with the higher priority holds the turn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurnToken {
    /// Owning team.
    pub team: Team,
    /// Floating priority in `(0, 1)`.
    pub priority: f64,
}

impl TurnToken {
    /// Create a token.
    pub fn new(team: Team, priority: f64) -> Self {
        Self { team, priority }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coord_parses_letter_digit() {
        let c: Coord = "D4".parse().unwrap();
        assert_eq!((c.x(), c.y()), (3, 4));

        let c: Coord = " j9 ".parse().unwrap();
        assert_eq!((c.x(), c.y()), (9, 9));
    }

    #[test]
    fn coord_display_matches_parse() {
        let c = Coord::new(0, 7).unwrap();
        assert_eq!(c.to_string(), "A7");
        assert_eq!("A7".parse::<Coord>().unwrap(), c);
    }

    #[test]
    fn coord_rejects_bad_text() {
        for bad in ["", "K1", "A", "A10", "4D", "@3"] {
            assert!(
                matches!(
                    bad.parse::<Coord>(),
                    Err(ValidationError::InvalidCoordinate(_))
                ),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn coord_rejects_out_of_range() {
        assert_eq!(
            Coord::new(-1, 0),
            Err(ValidationError::OutOfBounds { x: -1, y: 0 })
        );
        assert!(Coord::new(0, 10).is_err());
        assert!(Coord::from_stored(12, 0).is_err());
    }

    #[test]
    fn coord_all_covers_grid() {
        assert_eq!(Coord::all().count(), 100);
    }

    #[test]
    fn board_ownership() {
        assert_eq!(Board::ships(Team::Red), Board::RedShips);
        assert_eq!(Board::shots(Team::Blue), Board::BlueShots);
        assert_eq!(Board::BlueShots.team(), Team::Blue);
        assert!(Board::RedShips.is_ship_board());
        assert!(!Board::RedShots.is_ship_board());
    }

    #[test]
    fn stored_spellings_roundtrip() {
        for board in Board::ALL {
            assert_eq!(Board::from_stored(board.as_str()).unwrap(), board);
        }
        for state in [CellState::Ship, CellState::Hit, CellState::Miss] {
            assert_eq!(CellState::from_code(state.code()).unwrap(), state);
        }
        for team in Team::ALL {
            assert_eq!(Team::from_stored(team.as_str()).unwrap(), team);
        }
        for outcome in [ShotOutcome::Hit, ShotOutcome::Miss] {
            assert_eq!(ShotOutcome::from_stored(outcome.as_str()).unwrap(), outcome);
        }
        assert!(Board::from_stored("green_ships").is_err());
        assert!(CellState::from_code("X").is_err());
    }

    #[test]
    fn team_opponent() {
        assert_eq!(Team::Red.opponent(), Team::Blue);
        assert_eq!(Team::Blue.opponent(), Team::Red);
    }

    #[test]
    fn orientation_parses_short_forms() {
        assert_eq!("h".parse::<Orientation>().unwrap(), Orientation::Horizontal);
        assert_eq!("Vertical".parse::<Orientation>().unwrap(), Orientation::Vertical);
        assert!("diagonal".parse::<Orientation>().is_err());
    }
}
