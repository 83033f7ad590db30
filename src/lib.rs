//! # grid-tactics
//!
//! A deterministic rules engine for a turn-based tactics game on a square
//! grid, for 2 to 4 players.
//!
//! ## Design Principles
//!
//! 1. **Authoritative**: Every action is validated against the full rules
//!    before anything changes. A rejected action leaves no trace.
//!
//! 2. **Deterministic**: Combat rolls come from a seeded ChaCha stream (or
//!    any `RollSource`), and all game collections iterate in a fixed order.
//!    Replaying a transaction log reproduces the game exactly.
//!
//! 3. **N-Player First**: Slot counts come from the map; nothing assumes
//!    two players.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: `Game` is built on `im-rs`, so the
//!   engine applies each batch to an O(1) clone and commits only on success.
//!
//! - **Write-Through Indexes**: Occupancy and per-slot counts are updated
//!   with every mutation and checked by `state::check_invariants`.
//!
//! ## Modules
//!
//! - `core`: Ids, players, positions, RNG, configuration, actions, events, errors
//! - `units`: Unit types and unit instances
//! - `map`: Terrain, buildings, map templates and the template registry
//! - `spatial`: Position → unit index
//! - `state`: Per-game state and the invariant checker
//! - `rules`: Movement, combat, capture, economy, turns, victory, lobby
//! - `engine`: Storage and transactional dispatch
//! - `view`: Snapshots, pagination and binary checkpoints

pub mod core;
pub mod engine;
pub mod map;
pub mod rules;
pub mod spatial;
pub mod state;
pub mod units;
pub mod view;

// Re-export commonly used types
pub use crate::core::{
    path, AccountId, Action, ActionRecord, EngineError, ErrorKind, GameEvent, GameId, GameRng,
    MapId, Path, PlayerId, PlayerMap, Position, RollSource, RulesConfig, ScriptedRolls, Strike,
    Transaction, UnitId, UnitStats, Victory,
};

pub use crate::engine::{Engine, MemoryStore, StateStore};

pub use crate::map::{BuildingKind, MapError, MapRegistry, MapTemplate, Terrain};

pub use crate::rules::{apply_action, GameResult};

pub use crate::state::{check_invariants, Building, Game, GameStatus, InvariantViolation, PlayerSlot};

pub use crate::units::{Unit, UnitType};

pub use crate::view::{GameSnapshot, MapSnapshot, Page, PageRequest, SnapshotError};
