//! # salvo-client
//!
//! Game sessions for salvo.
//!
//! This is the library the `salvo` binary drives. It wires the pure rules
//! from `salvo-core` to a [`Ledger`](salvo_ledger::Ledger):
//!
//! - [`PlayerSession`]: one team's private view, coin flip, fleet placement
//!   and shots
//! - [`SpectatorSession`]: the two-sided view used by the watch mode
//! - [`Poller`]: fingerprint polling shared by both
//!
//! ```text
//! CLI → PlayerSession → Ledger → game_<id>.db
//!             ↓
//!        salvo-core (pure rules)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod poll;
pub mod session;
pub mod spectator;

pub use error::{EngineError, EngineResult};
pub use poll::{Poller, DEFAULT_POLL_INTERVAL};
pub use session::{PlayerSession, SessionConfig};
pub use spectator::SpectatorSession;
