//! Map templates.
//!
//! A `MapTemplate` is the immutable description a game is instantiated
//! from: board size, sparse terrain (everything unlisted is Grass),
//! buildings with their starting owners, and starting units.
//!
//! The number of players a template supports is its HQ count. Templates
//! are checked once, at registration, by [`MapTemplate::validate`].
//!
//! ## Example
//!
//! ```
//! use grid_tactics::core::PlayerId;
//! use grid_tactics::map::{BuildingKind, MapTemplate, Terrain};
//! use grid_tactics::units::UnitType;
//!
//! let p1 = PlayerId::new(1);
//! let p2 = PlayerId::new(2);
//! let map = MapTemplate::new("duel", 6, 4)
//!     .with_tile((2, 1), Terrain::Mountain)
//!     .with_building((0, 0), BuildingKind::HQ, Some(p1))
//!     .with_building((5, 3), BuildingKind::HQ, Some(p2))
//!     .with_building((3, 2), BuildingKind::City, None)
//!     .with_unit((1, 0), p1, UnitType::Infantry)
//!     .with_unit((4, 3), p2, UnitType::Tank);
//!
//! assert!(map.validate().is_ok());
//! assert_eq!(map.player_count(), 2);
//! assert_eq!(map.terrain_at((3, 2).into()), Terrain::City);
//! ```

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::terrain::{BuildingKind, Terrain};
use crate::core::player::{PlayerId, MAX_PLAYERS, MIN_PLAYERS};
use crate::core::position::Position;
use crate::units::UnitType;

/// A non-default terrain tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileSpec {
    pub position: Position,
    pub terrain: Terrain,
}

/// A building placement. `owner == None` is neutral.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildingSpec {
    pub position: Position,
    pub kind: BuildingKind,
    pub owner: Option<PlayerId>,
}

/// A starting unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitSpec {
    pub position: Position,
    pub owner: PlayerId,
    pub unit_type: UnitType,
}

/// Reasons a template is refused at registration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("map must be at least 1x1, got {width}x{height}")]
    EmptyDimensions { width: u8, height: u8 },

    #[error("map needs {MIN_PLAYERS} to {MAX_PLAYERS} HQs, found {0}")]
    HqCount(usize),

    #[error("HQ at {0} has no owner")]
    NeutralHq(Position),

    #[error("HQ owners must be players 1..={player_count}, one each; {player} appears twice")]
    DuplicateHqOwner { player: PlayerId, player_count: u8 },

    #[error("owner {owner} at {position} is not a slot of a {player_count}-player map")]
    OwnerOutOfRange { position: Position, owner: PlayerId, player_count: u8 },

    #[error("{0} lies outside the map")]
    OutOfBounds(Position),

    #[error("tile {0} is listed twice")]
    DuplicateTile(Position),

    #[error("two buildings at {0}")]
    DuplicateBuilding(Position),

    #[error("two units start at {0}")]
    DuplicateUnit(Position),

    #[error("tile at {position} is {found:?} but its building needs {expected:?}")]
    TerrainMismatch { position: Position, expected: Terrain, found: Terrain },

    #[error("{unit_type} cannot start on {terrain:?} at {position}")]
    ImpassableStart { position: Position, unit_type: UnitType, terrain: Terrain },
}

/// Immutable map definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapTemplate {
    pub name: String,
    pub width: u8,
    pub height: u8,
    #[serde(default)]
    pub tiles: Vec<TileSpec>,
    #[serde(default)]
    pub buildings: Vec<BuildingSpec>,
    #[serde(default)]
    pub units: Vec<UnitSpec>,
}

impl MapTemplate {
    /// An all-Grass board with nothing on it.
    #[must_use]
    pub fn new(name: impl Into<String>, width: u8, height: u8) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            tiles: Vec::new(),
            buildings: Vec::new(),
            units: Vec::new(),
        }
    }

    /// Set the terrain of one tile.
    #[must_use]
    pub fn with_tile(mut self, position: impl Into<Position>, terrain: Terrain) -> Self {
        self.tiles.push(TileSpec {
            position: position.into(),
            terrain,
        });
        self
    }

    /// Place a building.
    #[must_use]
    pub fn with_building(
        mut self,
        position: impl Into<Position>,
        kind: BuildingKind,
        owner: Option<PlayerId>,
    ) -> Self {
        self.buildings.push(BuildingSpec {
            position: position.into(),
            kind,
            owner,
        });
        self
    }

    /// Place a starting unit.
    #[must_use]
    pub fn with_unit(mut self, position: impl Into<Position>, owner: PlayerId, unit_type: UnitType) -> Self {
        self.units.push(UnitSpec {
            position: position.into(),
            owner,
            unit_type,
        });
        self
    }

    /// Number of player slots: one per HQ.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.buildings.iter().filter(|b| b.kind == BuildingKind::HQ).count()
    }

    /// Effective terrain at `position`: building terrain wins, then the
    /// explicit tile list, then Grass.
    #[must_use]
    pub fn terrain_at(&self, position: Position) -> Terrain {
        if let Some(building) = self.buildings.iter().find(|b| b.position == position) {
            return building.kind.terrain();
        }
        self.tiles
            .iter()
            .find(|t| t.position == position)
            .map_or(Terrain::Grass, |t| t.terrain)
    }

    /// Dense row-major terrain grid.
    #[must_use]
    pub fn terrain_grid(&self) -> Vec<Terrain> {
        let mut grid = vec![Terrain::Grass; usize::from(self.width) * usize::from(self.height)];
        for tile in &self.tiles {
            if tile.position.in_bounds(self.width, self.height) {
                grid[tile.position.grid_index(self.width)] = tile.terrain;
            }
        }
        for building in &self.buildings {
            if building.position.in_bounds(self.width, self.height) {
                grid[building.position.grid_index(self.width)] = building.kind.terrain();
            }
        }
        grid
    }

    /// Check every placement rule. Returns the first problem found.
    pub fn validate(&self) -> Result<(), MapError> {
        if self.width == 0 || self.height == 0 {
            return Err(MapError::EmptyDimensions {
                width: self.width,
                height: self.height,
            });
        }

        let player_count = self.player_count();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count) {
            return Err(MapError::HqCount(player_count));
        }
        // Bounded by MAX_PLAYERS above.
        let count = player_count as u8;

        let check_owner = |position: Position, owner: PlayerId| {
            if owner.is_valid(player_count) {
                Ok(())
            } else {
                Err(MapError::OwnerOutOfRange {
                    position,
                    owner,
                    player_count: count,
                })
            }
        };

        let mut seen: FxHashSet<Position> = FxHashSet::default();
        for tile in &self.tiles {
            if !tile.position.in_bounds(self.width, self.height) {
                return Err(MapError::OutOfBounds(tile.position));
            }
            if !seen.insert(tile.position) {
                return Err(MapError::DuplicateTile(tile.position));
            }
        }

        let mut hq_owners: FxHashSet<PlayerId> = FxHashSet::default();
        let mut buildings: FxHashSet<Position> = FxHashSet::default();
        for building in &self.buildings {
            let position = building.position;
            if !position.in_bounds(self.width, self.height) {
                return Err(MapError::OutOfBounds(position));
            }
            if !buildings.insert(position) {
                return Err(MapError::DuplicateBuilding(position));
            }
            if let Some(owner) = building.owner {
                check_owner(position, owner)?;
            }
            if building.kind == BuildingKind::HQ {
                let owner = building.owner.ok_or(MapError::NeutralHq(position))?;
                if !hq_owners.insert(owner) {
                    return Err(MapError::DuplicateHqOwner {
                        player: owner,
                        player_count: count,
                    });
                }
            }
            if let Some(tile) = self.tiles.iter().find(|t| t.position == position) {
                let expected = building.kind.terrain();
                if tile.terrain != expected {
                    return Err(MapError::TerrainMismatch {
                        position,
                        expected,
                        found: tile.terrain,
                    });
                }
            }
        }

        let mut occupied: FxHashSet<Position> = FxHashSet::default();
        for unit in &self.units {
            let position = unit.position;
            if !position.in_bounds(self.width, self.height) {
                return Err(MapError::OutOfBounds(position));
            }
            check_owner(position, unit.owner)?;
            if !occupied.insert(position) {
                return Err(MapError::DuplicateUnit(position));
            }
            let terrain = self.terrain_at(position);
            if terrain == Terrain::Mountain && !unit.unit_type.can_traverse_mountains() {
                return Err(MapError::ImpassableStart {
                    position,
                    unit_type: unit.unit_type,
                    terrain,
                });
            }
        }

        Ok(())
    }
}
