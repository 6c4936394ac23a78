//! # salvo-core
//!
//! Pure logic for salvo (no I/O, instant tests).
//!
//! This crate implements the coordination rules of a two-party Battleship
//! game whose state lives in a shared ledger, without touching the ledger:
//!
//! - [`detector`]: classify snapshot fingerprints as changed or unchanged
//! - [`turn`]: arbitrate whose turn it is from two floating priorities
//! - [`placement`]: validate ship placements and draw random candidates
//! - [`shot`]: validate a shot and resolve hit or miss
//! - [`projection`]: derive each participant's private view
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take ledger rows and produce
//! decisions without side effects. The reads and writes against the shared
//! store are performed by `salvo-ledger`, driven by `salvo-client`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod detector;
pub mod placement;
pub mod projection;
pub mod shot;
pub mod turn;

pub use detector::{ChangeDetector, Observation};
pub use placement::{fleet_cells, Candidate, ShipPlacement, FLEET, MAX_PLACEMENT_ATTEMPTS};
pub use projection::{project, spectate, BoardMap, Projection, SideView, SpectatorView};
pub use shot::ShotTarget;
pub use turn::{advance, coin_flip, TurnState, MOVER_PRIORITY, OPPONENT_PRIORITY};
