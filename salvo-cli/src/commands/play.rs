//! The participant loop shared by `start` and `join`.

use anyhow::{Context as _, Result};
use rand::Rng;
use salvo_client::{EngineError, PlayerSession};
use salvo_core::{fleet_cells, TurnState, FLEET};
use salvo_ledger::Ledger;
use salvo_types::{Board, Coord, Orientation, ShotOutcome, ValidationError};
use std::io::Write;
use tokio::io::{AsyncBufRead, Lines};

use crate::render::Terminal;

/// How the fleet gets onto the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Random positions.
    Random,
    /// Read each ship from the input.
    Manual,
}

/// Claim a side: place the fleet, then flip the coin.
///
/// The flip comes last because the game starts, and fleets are fixed, as
/// soon as both sides have flipped.
pub async fn setup<L, R, G>(
    session: &PlayerSession<L>,
    term: Terminal,
    rng: &mut G,
    placement: Placement,
    input: &mut Lines<R>,
) -> Result<()>
where
    L: Ledger,
    R: AsyncBufRead + Unpin,
    G: Rng + ?Sized,
{
    let team = session.team();
    if session.has_flipped().await? {
        anyhow::bail!("This game already has a {team} player.");
    }

    match placement {
        Placement::Random => {
            session
                .place_random_fleet(rng)
                .await
                .context("Failed to place fleet")?;
        }
        Placement::Manual => place_manually(session, term, input).await?,
    }

    match session.flip_coin(rng).await {
        Ok(_) => {}
        Err(EngineError::Conflict(_)) => {
            anyhow::bail!("This game already has a {team} player.")
        }
        Err(e) => return Err(e).context("Failed to flip coin"),
    }

    println!("{}", term.success(format!("{team} fleet is in position.")));
    Ok(())
}

/// Parse `"<coord> <h|v>"`, e.g. `A0 h`.
pub fn parse_ship(line: &str) -> Result<(Coord, Orientation), ValidationError> {
    let mut parts = line.split_whitespace();
    let coord = parts
        .next()
        .ok_or_else(|| ValidationError::InvalidCoordinate(line.to_string()))?
        .parse()?;
    let orientation = parts
        .next()
        .ok_or_else(|| ValidationError::InvalidOrientation(String::new()))?
        .parse()?;
    if let Some(extra) = parts.next() {
        return Err(ValidationError::InvalidOrientation(extra.to_string()));
    }
    Ok((coord, orientation))
}

async fn place_manually<L, R>(
    session: &PlayerSession<L>,
    term: Terminal,
    input: &mut Lines<R>,
) -> Result<()>
where
    L: Ledger,
    R: AsyncBufRead + Unpin,
{
    let board = Board::ships(session.team());
    for &length in FLEET.iter() {
        loop {
            prompt(&format!("Place ship of length {length} (e.g. A0 h): "))?;
            let Some(line) = input.next_line().await? else {
                anyhow::bail!("Input closed before the fleet was placed");
            };
            let (origin, orientation) = match parse_ship(&line) {
                Ok(parsed) => parsed,
                Err(e) => {
                    println!("{}", term.error(e));
                    continue;
                }
            };
            let placed = session
                .place_ship(
                    board,
                    i32::from(origin.x()),
                    i32::from(origin.y()),
                    i32::from(length),
                    orientation,
                )
                .await;
            match placed {
                Ok(_) => {
                    let view = session.project().await?;
                    println!("{}", term.player_boards(&view));
                    break;
                }
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(e) => println!("{}", term.error(e)),
            }
        }
    }
    Ok(())
}

/// Play until the game ends, the input closes, or Ctrl-C.
pub async fn run<L, R>(
    session: &mut PlayerSession<L>,
    term: Terminal,
    input: &mut Lines<R>,
) -> Result<()>
where
    L: Ledger,
    R: AsyncBufRead + Unpin,
{
    let team = session.team();
    let opponent = team.opponent();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!("Leaving the game.");
                return Ok(());
            }
            changed = session.wait_for_change() => changed?,
        }

        let view = session.project().await?;
        println!("{}", term.player_boards(&view));

        if view.is_defeated() {
            println!("{}", term.error(format!("Your fleet is sunk. {opponent} wins.")));
            return Ok(());
        }
        if view.hits_scored() >= fleet_cells() {
            println!("{}", term.success(format!("You sank the {opponent} fleet. {team} wins!")));
            return Ok(());
        }

        match session.turn().await? {
            TurnState::NotStarted => println!("Waiting for {opponent} to join..."),
            turn if turn.can_act(team) => {
                if !take_turn(session, term, input).await? {
                    println!("Leaving the game.");
                    return Ok(());
                }
            }
            _ => println!("Waiting for {opponent} to fire..."),
        }
    }
}

/// Read coordinates until one shot lands. Returns `false` when the player
/// quits or the input closes.
async fn take_turn<L, R>(
    session: &PlayerSession<L>,
    term: Terminal,
    input: &mut Lines<R>,
) -> Result<bool>
where
    L: Ledger,
    R: AsyncBufRead + Unpin,
{
    loop {
        prompt("Your move (e.g. D4, q to quit): ")?;
        let line = tokio::select! {
            _ = tokio::signal::ctrl_c() => return Ok(false),
            line = input.next_line() => line?,
        };
        let Some(line) = line else {
            return Ok(false);
        };
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
            return Ok(false);
        }

        let target: Coord = match line.parse() {
            Ok(coord) => coord,
            Err(e) => {
                println!("{}", term.error(e));
                continue;
            }
        };

        match session.fire(target).await {
            Ok(ShotOutcome::Hit) => {
                println!("{}", term.success(format!("Hit at {target}!")));
                return Ok(true);
            }
            Ok(ShotOutcome::Miss) => {
                println!("Miss at {target}.");
                return Ok(true);
            }
            Err(EngineError::Validation(e @ ValidationError::AlreadyFired { .. })) => {
                println!("{}", term.error(e));
            }
            Err(e) if e.is_fatal() => return Err(e.into()),
            // Lost a race or the turn moved on; go back to polling.
            Err(e) => {
                println!("{}", term.error(e));
                return Ok(true);
            }
        }
    }
}

fn prompt(text: &str) -> Result<()> {
    print!("{text}");
    std::io::stdout().flush().context("Failed to write prompt")
}
