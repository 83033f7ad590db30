//! Boards: terrain, buildings and the templates games are created from.

pub mod registry;
pub mod template;
pub mod terrain;

pub use registry::MapRegistry;
pub use template::{BuildingSpec, MapError, MapTemplate, TileSpec, UnitSpec};
pub use terrain::{BuildingKind, Terrain};
