//! Terrain and building kinds.
//!
//! Terrain numbers are fixed rules of the game: every lookup is an
//! exhaustive `match`, no defaults.

use serde::{Deserialize, Serialize};

/// Terrain of a single tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Terrain {
    #[default]
    Grass,
    Mountain,
    City,
    Factory,
    HQ,
    Road,
    Tree,
    DirtRoad,
}

impl Terrain {
    /// Movement points spent stepping onto this tile.
    #[must_use]
    pub const fn move_cost(self) -> u8 {
        match self {
            Terrain::Mountain => 2,
            Terrain::Grass
            | Terrain::City
            | Terrain::Factory
            | Terrain::HQ
            | Terrain::Road
            | Terrain::Tree
            | Terrain::DirtRoad => 1,
        }
    }

    /// Damage reduction for a unit standing here when it is struck.
    #[must_use]
    pub const fn defense(self) -> u8 {
        match self {
            Terrain::Grass | Terrain::Road | Terrain::DirtRoad => 0,
            Terrain::Tree | Terrain::City | Terrain::Factory => 1,
            Terrain::Mountain | Terrain::HQ => 2,
        }
    }

    /// Hit-chance penalty for strikes aimed at a unit standing here.
    #[must_use]
    pub const fn evasion(self) -> u8 {
        match self {
            Terrain::Grass | Terrain::Road | Terrain::DirtRoad => 0,
            Terrain::Tree => 5,
            Terrain::City | Terrain::Factory => 8,
            Terrain::HQ => 10,
            Terrain::Mountain => 12,
        }
    }

    /// Road tiles feed the road movement bonus.
    #[must_use]
    pub const fn is_road(self) -> bool {
        match self {
            Terrain::Road | Terrain::DirtRoad => true,
            Terrain::Grass
            | Terrain::Mountain
            | Terrain::City
            | Terrain::Factory
            | Terrain::HQ
            | Terrain::Tree => false,
        }
    }
}

/// Kind of a capturable building.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    City,
    Factory,
    HQ,
}

impl BuildingKind {
    /// Terrain of the tile a building of this kind sits on.
    #[must_use]
    pub const fn terrain(self) -> Terrain {
        match self {
            BuildingKind::City => Terrain::City,
            BuildingKind::Factory => Terrain::Factory,
            BuildingKind::HQ => Terrain::HQ,
        }
    }
}

impl std::fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BuildingKind::City => "City",
            BuildingKind::Factory => "Factory",
            BuildingKind::HQ => "HQ",
        };
        f.write_str(name)
    }
}
