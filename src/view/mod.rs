//! Read-only projections and checkpoints.
//!
//! ## Key Types
//!
//! - `GameSnapshot`: game, slots, units and buildings, keyed by game id
//! - `MapSnapshot`: a registered template with paginated terrain
//! - `Page` / `PageRequest`: offset pagination
//! - `SnapshotError`: binary checkpoint failures (`Game::to_bytes`)

pub mod checkpoint;
pub mod snapshot;

pub use checkpoint::SnapshotError;
pub use snapshot::{game_tiles, GameSnapshot, MapSnapshot, Page, PageRequest, SlotView, TileEntry, MAX_PAGE};
