//! Core engine types: identifiers, players, positions, actions, events,
//! RNG, configuration and errors.
//!
//! Nothing in here knows how a rule is evaluated; `rules` builds on these.

pub mod entity;
pub mod player;
pub mod position;
pub mod rng;
pub mod config;
pub mod action;
pub mod event;
pub mod error;

pub use entity::{AccountId, GameId, MapId, UnitId};
pub use player::{PlayerId, PlayerMap, MAX_PLAYERS, MIN_PLAYERS};
pub use position::{path, Path, Position};
pub use rng::{GameRng, GameRngState, RollSource, ScriptedRolls};
pub use config::{ConfigError, RulesConfig, UnitStats};
pub use action::{Action, ActionRecord, Transaction};
pub use event::{GameEvent, Strike, Victory};
pub use error::{EngineError, ErrorKind, Result};
