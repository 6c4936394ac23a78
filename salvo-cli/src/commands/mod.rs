//! CLI command implementations.

pub mod join;
pub mod play;
pub mod start;
pub mod status;
pub mod watch;

use anyhow::{Context as _, Result};
use salvo_client::SessionConfig;
use salvo_ledger::SqliteLedger;
use salvo_types::GameId;
use std::path::PathBuf;

use crate::config::Config;
use crate::render::Terminal;

/// Everything a command needs besides its own arguments.
#[derive(Debug, Clone)]
pub struct Context {
    /// Directory holding the game databases.
    pub data_dir: PathBuf,
    /// Loaded configuration.
    pub config: Config,
    /// Output styling.
    pub term: Terminal,
}

impl Context {
    /// Session settings from the config.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::default().with_poll_interval(self.config.poll.interval())
    }

    /// Database file for `game`.
    pub fn game_path(&self, game: &GameId) -> PathBuf {
        SqliteLedger::path_for(&self.data_dir, game)
    }

    /// Open the database for `game`, creating it if needed.
    pub async fn create_game(&self, game: &GameId) -> Result<SqliteLedger> {
        let path = self.game_path(game);
        SqliteLedger::open(&path, self.config.store.busy_timeout())
            .await
            .with_context(|| format!("Failed to open game database {}", path.display()))
    }

    /// Open the database for a game that must already exist.
    pub async fn open_game(&self, game: &GameId) -> Result<SqliteLedger> {
        let path = self.game_path(game);
        if !path.exists() {
            anyhow::bail!("No game named '{game}'. Start one with 'salvo start {game}'.");
        }
        self.create_game(game).await
    }
}

#[cfg(test)]
pub(crate) fn test_context(data_dir: &std::path::Path) -> Context {
    Context {
        data_dir: data_dir.to_path_buf(),
        config: Config::default(),
        term: Terminal::plain(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_game_requires_an_existing_database() {
        let dir = tempdir().unwrap();
        let ctx = test_context(dir.path());
        let game = GameId::new("missing").unwrap();

        let err = ctx.open_game(&game).await.err().unwrap();
        assert!(err.to_string().contains("No game named 'missing'"));
        assert!(!ctx.game_path(&game).exists());

        ctx.create_game(&game).await.unwrap();
        assert!(ctx.open_game(&game).await.is_ok());
    }
}
