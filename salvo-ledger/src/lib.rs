//! # salvo-ledger
//!
//! Shared game store for salvo.
//!
//! Both participants open the same SQLite database and coordinate only
//! through it. There is no server and no message channel: every move is a
//! transaction, and every other participant learns about it by polling the
//! store's content fingerprint.
//!
//! ## Architecture
//!
//! ```text
//! Red process ──┐                    ┌── Blue process
//!               │   transactions     │
//!               ├───────────────────►│
//!               │                    │
//!           ┌───┴────────────────────┴───┐
//!           │     game_<id>.db (WAL)     │
//!           │  board_states │ coin │ moves│
//!           └────────────────────────────┘
//! ```
//!
//! ## Tables
//!
//! - `board_states`: one row per recorded cell, keyed by `(x, y, board)`
//! - `coin`: one turn token per team
//! - `moves`: append-only audit log of committed shots

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
pub use storage::{Ledger, SqliteLedger};
