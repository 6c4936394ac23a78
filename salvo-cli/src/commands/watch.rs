//! Watch a game with both fleets visible.

use anyhow::Result;
use salvo_client::SpectatorSession;
use salvo_core::{SpectatorView, TurnState};
use salvo_types::{GameId, Team};

use super::Context;

/// Run the watch command.
pub async fn run(ctx: &Context, game: &GameId) -> Result<()> {
    let ledger = ctx.open_game(game).await?;
    let mut spectator = SpectatorSession::new(ledger, ctx.session_config());

    println!("Watching game {game}. Press Ctrl-C to stop.");
    tracing::info!("Watching game {}", game);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => return Ok(()),
            changed = spectator.wait_for_change() => changed?,
        }

        let view = spectator.spectate().await?;
        println!("{}", ctx.term.spectator_boards(&view));

        if let Some(last) = spectator.moves().await?.last() {
            println!("Last move: {}", last.note);
        }

        if let Some(winner) = winner(&view) {
            println!("{}", ctx.term.success(format!("{winner} wins!")));
            return Ok(());
        }
        println!("{}", describe_turn(spectator.turn().await?));
    }
}

/// Whose fleet survived, once one side is sunk.
fn winner(view: &SpectatorView) -> Option<Team> {
    Team::ALL
        .into_iter()
        .find(|&team| view.side(team).is_defeated())
        .map(Team::opponent)
}

fn describe_turn(turn: TurnState) -> String {
    match turn {
        TurnState::NotStarted => "Waiting for both players to flip.".to_string(),
        TurnState::RedTurn => format!("{} to fire.", Team::Red),
        TurnState::BlueTurn => format!("{} to fire.", Team::Blue),
    }
}
