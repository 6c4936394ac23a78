//! Change detection for salvo.
//!
//! The shared store has no push or subscribe primitive, so each participant
//! polls the store's snapshot fingerprint. This module holds the pure half of
//! that loop: remembering the last fingerprint seen and classifying each new
//! one. Fetching and sleeping happen in `salvo-client`.
//!
//! Comparing fingerprints is the only admission filter: views are re-derived
//! only when the fingerprint differs from the last one seen.

use salvo_types::Fingerprint;

/// Result of observing one fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// The ledger content differs from the last observation.
    Changed,
    /// Same content as the last observation.
    Unchanged,
}

/// Remembers the last fingerprint seen.
#[derive(Debug, Clone, Default)]
pub struct ChangeDetector {
    last_seen: Option<Fingerprint>,
}

impl ChangeDetector {
    /// Create a detector that has seen nothing yet.
    ///
    /// The first observation is always [`Observation::Changed`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `current` and remember it.
    pub fn observe(&mut self, current: Fingerprint) -> Observation {
        if self.last_seen == Some(current) {
            Observation::Unchanged
        } else {
            self.last_seen = Some(current);
            Observation::Changed
        }
    }

    /// The last fingerprint observed.
    pub fn last_seen(&self) -> Option<Fingerprint> {
        self.last_seen
    }

    /// Forget the last fingerprint so the next observation reports a change.
    pub fn reset(&mut self) {
        self.last_seen = None;
    }
}
