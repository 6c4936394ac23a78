//! Join an existing game as blue.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use salvo_client::PlayerSession;
use salvo_types::{GameId, Team};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::play::{self, Placement};
use super::Context;

/// Run the join command.
pub async fn run(ctx: &Context, game: &GameId, placement: Placement) -> Result<()> {
    let ledger = ctx.open_game(game).await?;

    println!("{}", ctx.term.welcome());
    println!();
    println!("Joined game {game} as blue.");
    println!();

    tracing::info!("Joining game {} as blue", game);

    let mut session = PlayerSession::new(ledger, Team::Blue, ctx.session_config());
    let mut rng = StdRng::from_entropy();
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    play::setup(&session, ctx.term, &mut rng, placement, &mut input).await?;
    play::run(&mut session, ctx.term, &mut input).await
}
