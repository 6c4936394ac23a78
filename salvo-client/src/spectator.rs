//! SpectatorSession - the privileged two-sided view.
//!
//! Only the watch mode builds one of these. It can read both fleets but
//! cannot write anything.

use salvo_core::{spectate, Observation, SpectatorView, TurnState};
use salvo_ledger::Ledger;
use salvo_types::MoveRecord;

use crate::error::EngineResult;
use crate::poll::Poller;
use crate::session::SessionConfig;

/// Read-only observer of a whole game.
pub struct SpectatorSession<L: Ledger> {
    ledger: L,
    poller: Poller,
}

impl<L: Ledger> SpectatorSession<L> {
    /// Create a spectator over `ledger`.
    pub fn new(ledger: L, config: SessionConfig) -> Self {
        Self {
            ledger,
            poller: Poller::new(config.poll_interval),
        }
    }

    /// Both sides of the latest snapshot.
    pub async fn spectate(&self) -> EngineResult<SpectatorView> {
        let cells = self.ledger.cells().await?;
        Ok(spectate(&cells))
    }

    /// Current turn arbitration.
    pub async fn turn(&self) -> EngineResult<TurnState> {
        let tokens = self.ledger.tokens().await?;
        Ok(TurnState::from_tokens(&tokens))
    }

    /// The audit log, oldest first.
    pub async fn moves(&self) -> EngineResult<Vec<MoveRecord>> {
        Ok(self.ledger.moves().await?)
    }

    /// Read the fingerprint once, sleeping if nothing changed.
    pub async fn poll(&mut self) -> EngineResult<Observation> {
        self.poller.poll(&self.ledger).await
    }

    /// Wait for the next distinguishable snapshot.
    pub async fn wait_for_change(&mut self) -> EngineResult<()> {
        self.poller.wait_for_change(&self.ledger).await
    }
}
