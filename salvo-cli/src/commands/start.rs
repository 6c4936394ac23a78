//! Start a new game as red.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use salvo_client::PlayerSession;
use salvo_types::{GameId, Team};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::play::{self, Placement};
use super::Context;

/// Run the start command.
pub async fn run(ctx: &Context, id: Option<GameId>, placement: Placement) -> Result<()> {
    let game = id.unwrap_or_else(GameId::generate);
    let ledger = ctx.create_game(&game).await?;

    println!("{}", ctx.term.welcome());
    println!();
    println!("  Game ID:  {game}");
    println!("  Database: {}", ctx.game_path(&game).display());
    println!();
    println!("Your opponent joins with: salvo join {game}");
    println!();

    tracing::info!("Starting game {} as red", game);

    let mut session = PlayerSession::new(ledger, Team::Red, ctx.session_config());
    let mut rng = StdRng::from_entropy();
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    play::setup(&session, ctx.term, &mut rng, placement, &mut input).await?;
    play::run(&mut session, ctx.term, &mut input).await
}
