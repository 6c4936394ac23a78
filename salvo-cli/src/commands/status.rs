//! Show the state of a game database.

use anyhow::Result;
use salvo_core::TurnState;
use salvo_ledger::{Ledger, SqliteLedger};
use salvo_types::{Board, CellState, GameId};
use std::fmt::Write as _;
use std::path::Path;

use super::Context;

/// How many moves the report lists.
const RECENT_MOVES: usize = 5;

/// Run the status command.
pub async fn run(ctx: &Context, game: &GameId) -> Result<()> {
    let ledger = ctx.open_game(game).await?;
    print!("{}", report(&ledger, game, &ctx.game_path(game)).await?);
    Ok(())
}

/// Build the status report.
pub async fn report(ledger: &SqliteLedger, game: &GameId, path: &Path) -> Result<String> {
    let tables = ledger.tables().await?;
    let tokens = ledger.tokens().await?;
    let cells = ledger.cells().await?;
    let moves = ledger.moves().await?;
    let fingerprint = ledger.fingerprint().await?;

    let mut out = String::new();
    writeln!(out, "=== salvo status ===")?;
    writeln!(out)?;
    writeln!(out, "Game:")?;
    writeln!(out, "  ID:       {game}")?;
    writeln!(out, "  Database: {}", path.display())?;
    if tables.is_empty() {
        writeln!(out, "  Tables:   none")?;
    } else {
        writeln!(out, "  Tables:   {}", tables.join(", "))?;
    }
    writeln!(out)?;

    writeln!(out, "Turn:")?;
    let turn = match TurnState::from_tokens(&tokens).holder() {
        Some(team) => format!("{team} to fire"),
        None => "not started".to_string(),
    };
    writeln!(out, "  State: {turn}")?;
    for token in &tokens {
        writeln!(out, "  {:<5} {:.3}", format!("{}:", token.team), token.priority)?;
    }
    writeln!(out)?;

    writeln!(out, "Boards:")?;
    for board in Board::ALL {
        let on_board = cells.iter().filter(|c| c.board == board);
        let total = on_board.clone().count();
        let hits = on_board.filter(|c| c.state == CellState::Hit).count();
        writeln!(out, "  {:<11} {total:>3} cells, {hits:>2} hit", board.as_str())?;
    }
    writeln!(out)?;

    writeln!(out, "Moves: {}", moves.len())?;
    let skip = moves.len().saturating_sub(RECENT_MOVES);
    for record in &moves[skip..] {
        writeln!(out, "  #{:<3} {}", record.seq, record.note)?;
    }
    writeln!(out)?;
    writeln!(out, "Fingerprint: {fingerprint}")?;

    Ok(out)
}
