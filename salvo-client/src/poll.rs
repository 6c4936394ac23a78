//! Polling the ledger for new snapshots.

use std::time::Duration;

use salvo_core::{ChangeDetector, Observation};
use salvo_ledger::Ledger;

use crate::error::EngineResult;

/// Default interval between fingerprint reads.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Fetches fingerprints and sleeps between unchanged reads.
///
/// Fetch errors are returned immediately and never retried.
#[derive(Debug, Clone)]
pub struct Poller {
    detector: ChangeDetector,
    interval: Duration,
}

impl Poller {
    /// Create a poller that has seen nothing yet.
    pub fn new(interval: Duration) -> Self {
        Self {
            detector: ChangeDetector::new(),
            interval,
        }
    }

    /// Sleep time after an unchanged read.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Read the fingerprint once.
    ///
    /// On [`Observation::Unchanged`] this sleeps for the poll interval before
    /// returning.
    pub async fn poll<L: Ledger + ?Sized>(&mut self, ledger: &L) -> EngineResult<Observation> {
        let fingerprint = ledger.fingerprint().await?;
        let observation = self.detector.observe(fingerprint);

        match observation {
            Observation::Changed => {
                tracing::debug!("Snapshot changed: {}", fingerprint);
            }
            Observation::Unchanged => {
                tracing::trace!("Snapshot unchanged, sleeping {:?}", self.interval);
                tokio::time::sleep(self.interval).await;
            }
        }
        Ok(observation)
    }

    /// Poll until the snapshot differs from the last one seen.
    ///
    /// Cancel by dropping the future.
    pub async fn wait_for_change<L: Ledger + ?Sized>(&mut self, ledger: &L) -> EngineResult<()> {
        while self.poll(ledger).await? == Observation::Unchanged {}
        Ok(())
    }

    /// Forget the last snapshot so the next poll reports a change.
    pub fn reset(&mut self) {
        self.detector.reset();
    }
}

impl Default for Poller {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use salvo_ledger::SqliteLedger;
    use salvo_types::{Team, TurnToken};

    fn fast() -> Poller {
        Poller::new(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn first_poll_reports_a_change() {
        let ledger = SqliteLedger::in_memory().await.unwrap();
        let mut poller = fast();
        assert_eq!(poller.poll(&ledger).await.unwrap(), Observation::Changed);
        assert_eq!(poller.poll(&ledger).await.unwrap(), Observation::Unchanged);
    }

    #[tokio::test]
    async fn write_is_noticed() {
        let ledger = SqliteLedger::in_memory().await.unwrap();
        let mut poller = fast();
        poller.poll(&ledger).await.unwrap();

        ledger
            .insert_token(TurnToken::new(Team::Red, 0.5))
            .await
            .unwrap();
        assert_eq!(poller.poll(&ledger).await.unwrap(), Observation::Changed);
    }

    #[tokio::test]
    async fn reset_forces_a_change() {
        let ledger = SqliteLedger::in_memory().await.unwrap();
        let mut poller = fast();
        poller.poll(&ledger).await.unwrap();
        poller.reset();
        assert_eq!(poller.poll(&ledger).await.unwrap(), Observation::Changed);
    }

    #[tokio::test]
    async fn wait_for_change_returns_after_a_write() {
        let ledger = SqliteLedger::in_memory().await.unwrap();
        let mut poller = fast();
        poller.poll(&ledger).await.unwrap();

        let writer = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            ledger
                .insert_token(TurnToken::new(Team::Blue, 0.25))
                .await
                .unwrap();
        };
        let (waited, ()) = tokio::join!(poller.wait_for_change(&ledger), writer);
        waited.unwrap();
        assert_eq!(ledger.tokens().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn closed_store_fails_immediately() {
        let ledger = SqliteLedger::in_memory().await.unwrap();
        ledger.close().await;

        let err = fast().poll(&ledger).await.unwrap_err();
        assert!(matches!(err, EngineError::StoreUnavailable(_)));
    }
}
