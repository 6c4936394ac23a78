//! Terminal rendering.
//!
//! Two boards side by side: the viewer's ships with incoming shots on the
//! left, the viewer's own shots on the right. Columns are `A`-`J`, rows
//! `0`-`9`. In color mode every marker is a dot (plain for a ship, red for a
//! hit, blue for a miss); without color the state codes `S`, `H` and `M`
//! are printed instead.

use std::fmt::{self, Display};
use std::io::IsTerminal;

use crossterm::style::Stylize;
use salvo_core::{BoardMap, Projection, SpectatorView};
use salvo_types::{CellState, Coord, Team, BOARD_SIZE};

const GAP: &str = "          ";
const MARKER: &str = "●";

/// Board labels for `team`: ship side first, shot side second.
pub fn labels(team: Team) -> (&'static str, &'static str) {
    match team {
        Team::Red => ("Blue Shots/Red Ships", "Red Shots"),
        Team::Blue => ("Red Shots/Blue Ships", "Blue Shots"),
    }
}

/// Renders boards and status lines, with or without ANSI color.
#[derive(Debug, Clone, Copy)]
pub struct Terminal {
    color: bool,
}

impl Terminal {
    /// Color when stdout is a terminal and `NO_COLOR` is unset.
    pub fn detect() -> Self {
        Self {
            color: std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
        }
    }

    /// Never color.
    pub fn plain() -> Self {
        Self { color: false }
    }

    /// Greeting shown when a game starts.
    pub fn welcome(&self) -> String {
        if self.color {
            format!(
                "{}\n{}",
                "Welcome to Battleship!".blue(),
                "Prepare for battle!".yellow()
            )
        } else {
            "Welcome to Battleship!\nPrepare for battle!".to_string()
        }
    }

    /// An error line.
    pub fn error(&self, msg: impl Display) -> String {
        let line = format!("Error: {msg}");
        if self.color {
            line.red().to_string()
        } else {
            line
        }
    }

    /// A success line.
    pub fn success(&self, msg: impl Display) -> String {
        if self.color {
            msg.to_string().green().to_string()
        } else {
            msg.to_string()
        }
    }

    fn marker(&self, state: CellState) -> String {
        if !self.color {
            return state.code().to_string();
        }
        match state {
            CellState::Ship => MARKER.to_string(),
            CellState::Hit => MARKER.red().to_string(),
            CellState::Miss => MARKER.blue().to_string(),
        }
    }

    /// Render one side: `ships` overlaid with `incoming` on the left,
    /// `shots` on the right.
    pub fn boards(
        &self,
        labels: (&str, &str),
        ships: &BoardMap,
        incoming: &BoardMap,
        shots: &BoardMap,
    ) -> String {
        Boards {
            term: *self,
            labels,
            ships,
            incoming,
            shots,
        }
        .to_string()
    }

    /// A participant's own view.
    pub fn player_boards(&self, projection: &Projection) -> String {
        self.boards(
            labels(projection.viewer),
            &projection.own_ships,
            &projection.incoming_shots,
            &projection.own_shots,
        )
    }

    /// Both sides, red first.
    pub fn spectator_boards(&self, view: &SpectatorView) -> String {
        Team::ALL
            .iter()
            .map(|&team| {
                let side = view.side(team);
                self.boards(labels(team), &side.ships, &side.incoming_shots, &side.shots)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One side's two boards, laid out for display.
struct Boards<'a> {
    term: Terminal,
    labels: (&'a str, &'a str),
    ships: &'a BoardMap,
    incoming: &'a BoardMap,
    shots: &'a BoardMap,
}

impl Boards<'_> {
    fn cell(&self, f: &mut fmt::Formatter<'_>, state: Option<CellState>) -> fmt::Result {
        match state {
            Some(state) => write!(f, "{}|", self.term.marker(state)),
            None => f.write_str(" |"),
        }
    }
}

impl fmt::Display for Boards<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (left_label, right_label) = self.labels;
        let border = "-".repeat(2 * usize::from(BOARD_SIZE));
        let header: String = (b'A'..b'A' + BOARD_SIZE)
            .map(|c| format!("{} ", c as char))
            .collect();

        writeln!(f, "{left_label}{GAP}{right_label}")?;
        writeln!(f, "  {header}{GAP}  {header}")?;
        writeln!(f, "  {border}{GAP}  {border}")?;

        let grid: Vec<Coord> = Coord::all().collect();
        for (y, row) in grid.chunks(usize::from(BOARD_SIZE)).enumerate() {
            write!(f, "{y}|")?;
            for coord in row {
                let state = self.ships.get(coord).or_else(|| self.incoming.get(coord));
                self.cell(f, state.copied())?;
            }
            write!(f, "{GAP}{y}|")?;
            for coord in row {
                self.cell(f, self.shots.get(coord).copied())?;
            }
            writeln!(f)?;
            writeln!(f, "  {border}{GAP}  {border}")?;
        }
        Ok(())
    }
}
