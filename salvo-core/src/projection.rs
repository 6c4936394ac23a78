//! Per-participant views of the ledger.
//!
//! The ledger itself is readable by anyone; information hiding happens here.
//! A participant's [`Projection`] is built only from that participant's own
//! two boards:
//!
//! - `own_ships`: the viewer's ship board.
//! - `incoming_shots`: the Hit/Miss markers on the viewer's ship board. A hit
//!   there *is* the opponent's shot outcome. The opponent's own shot board is
//!   never consulted.
//! - `own_shots`: the viewer's shot board.
//!
//! The opponent's ship layout never appears. [`SpectatorView`] shows both
//! sides at once and is reserved for the watch mode.

use std::collections::BTreeMap;

use salvo_types::{Board, Cell, CellState, Coord, Team};

/// Coordinate-to-state map for one board.
pub type BoardMap = BTreeMap<Coord, CellState>;

/// What one participant may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    /// Viewing team.
    pub viewer: Team,
    /// The viewer's ship layout, hits included.
    pub own_ships: BoardMap,
    /// Opponent shot outcomes that landed on the viewer's ships.
    pub incoming_shots: BoardMap,
    /// The viewer's own shots and their outcomes.
    pub own_shots: BoardMap,
}

impl Projection {
    /// Ship segments not yet hit.
    pub fn remaining_ship_cells(&self) -> usize {
        self.own_ships
            .values()
            .filter(|s| **s == CellState::Ship)
            .count()
    }

    /// Every ship segment has been hit. False before any ship is placed.
    pub fn is_defeated(&self) -> bool {
        !self.own_ships.is_empty() && self.remaining_ship_cells() == 0
    }

    /// Hits scored by the viewer.
    pub fn hits_scored(&self) -> usize {
        self.own_shots
            .values()
            .filter(|s| **s == CellState::Hit)
            .count()
    }
}

/// Build `viewer`'s projection from raw ledger rows.
pub fn project(cells: &[Cell], viewer: Team) -> Projection {
    let own_ship_board = Board::ships(viewer);
    let own_shot_board = Board::shots(viewer);

    let mut own_ships = BoardMap::new();
    let mut incoming_shots = BoardMap::new();
    let mut own_shots = BoardMap::new();

    for cell in cells {
        if cell.board == own_ship_board {
            own_ships.insert(cell.coord, cell.state);
            if cell.state.is_shot_marker() {
                incoming_shots.insert(cell.coord, cell.state);
            }
        } else if cell.board == own_shot_board {
            own_shots.insert(cell.coord, cell.state);
        }
    }

    Projection {
        viewer,
        own_ships,
        incoming_shots,
        own_shots,
    }
}

/// One side of the spectator view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideView {
    /// The side's ship layout.
    pub ships: BoardMap,
    /// Everything the opponent has fired, hits and misses.
    pub incoming_shots: BoardMap,
    /// Everything this side has fired.
    pub shots: BoardMap,
}

impl SideView {
    /// Every ship segment on this side has been hit.
    pub fn is_defeated(&self) -> bool {
        !self.ships.is_empty() && self.ships.values().all(|s| *s == CellState::Hit)
    }
}

/// Both sides at once. Privileged: only the watch mode builds this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpectatorView {
    /// Red's boards.
    pub red: SideView,
    /// Blue's boards.
    pub blue: SideView,
}

impl SpectatorView {
    /// The view for `team`.
    pub fn side(&self, team: Team) -> &SideView {
        match team {
            Team::Red => &self.red,
            Team::Blue => &self.blue,
        }
    }
}

/// Build the spectator view from raw ledger rows.
pub fn spectate(cells: &[Cell]) -> SpectatorView {
    let mut boards: BTreeMap<Board, BoardMap> = BTreeMap::new();
    for cell in cells {
        boards
            .entry(cell.board)
            .or_default()
            .insert(cell.coord, cell.state);
    }
    let take = |board: Board| boards.get(&board).cloned().unwrap_or_default();

    let red_shots = take(Board::RedShots);
    let blue_shots = take(Board::BlueShots);
    SpectatorView {
        red: SideView {
            ships: take(Board::RedShips),
            incoming_shots: blue_shots.clone(),
            shots: red_shots.clone(),
        },
        blue: SideView {
            ships: take(Board::BlueShips),
            incoming_shots: red_shots,
            shots: blue_shots,
        },
    }
}
