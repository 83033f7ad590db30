//! Identifier types.
//!
//! Every persistent row in the engine is keyed by a small fixed-width
//! unsigned integer:
//!
//! - `GameId`: one match, allocated by the engine on `create_game`
//! - `MapId`: one registered map template
//! - `UnitId`: one unit, allocated per game starting at 1
//! - `AccountId`: a global controlling identity (the caller of an action)
//!
//! Slot indices within a game are a separate type, see `PlayerId`.
//!
//! ```
//! use grid_tactics::core::UnitId;
//!
//! let first = UnitId::FIRST;
//! assert_eq!(first.next(), UnitId(2));
//! ```

use serde::{Deserialize, Serialize};

/// Identifier of a single game instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GameId(pub u32);

/// Identifier of a registered map template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MapId(pub u32);

/// Identifier of a unit within one game.
///
/// Ids are allocated sequentially per game and never reused, so a dead
/// unit's id keeps pointing at its (not alive) record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// Global identity of whoever submits an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(pub u64);

impl GameId {
    /// First id handed out by a fresh store.
    pub const FIRST: GameId = GameId(1);

    /// The id following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl MapId {
    /// First id handed out by a fresh store.
    pub const FIRST: MapId = MapId(1);

    /// The id following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl UnitId {
    /// First unit id in every game.
    pub const FIRST: UnitId = UnitId(1);

    /// The id following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Game({})", self.0)
    }
}

impl std::fmt::Display for MapId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Map({})", self.0)
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unit({})", self.0)
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Account({:#x})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        assert_eq!(GameId::FIRST.next(), GameId(2));
        assert_eq!(MapId::FIRST.next().next(), MapId(3));
        assert_eq!(UnitId(7).next(), UnitId(8));
    }

    #[test]
    fn test_ordering() {
        assert!(UnitId(1) < UnitId(2));
        assert!(GameId(10) > GameId(9));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", UnitId(42)), "Unit(42)");
        assert_eq!(format!("{}", GameId(3)), "Game(3)");
        assert_eq!(format!("{}", MapId(1)), "Map(1)");
        assert_eq!(format!("{}", AccountId(255)), "Account(0xff)");
    }

    #[test]
    fn test_serialization() {
        let id = UnitId(123);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: UnitId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
