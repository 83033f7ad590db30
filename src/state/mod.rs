//! Per-game mutable state.
//!
//! ## Key Types
//!
//! - `Game`: one match, cheap to clone
//! - `GameStatus`: Lobby → Playing → Finished
//! - `PlayerSlot`, `Building`: per-slot and per-building rows
//! - `check_invariants`: consistency checker for tests and checkpoints

pub mod game;
pub mod invariants;
pub mod slot;

pub use game::{Game, GameStatus};
pub use invariants::{check_invariants, InvariantViolation};
pub use slot::{Building, PlayerSlot};
