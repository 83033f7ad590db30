//! Unit types - static unit data.
//!
//! Numeric stats (hp, attack, range, cost, ...) live in `RulesConfig` so
//! balance can be tuned without a rebuild. Capabilities are fixed rules of
//! the game and are answered here by exhaustive `match`, so adding a unit
//! type forces every capability to be decided for it.

use serde::{Deserialize, Serialize};

/// The closed set of unit types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UnitType {
    Infantry,
    Tank,
    Ranger,
}

impl UnitType {
    /// Every unit type, in tag order.
    pub const ALL: [UnitType; 3] = [UnitType::Infantry, UnitType::Tank, UnitType::Ranger];

    /// Can this type step onto Mountain tiles?
    #[must_use]
    pub const fn can_traverse_mountains(self) -> bool {
        match self {
            UnitType::Infantry => true,
            UnitType::Tank | UnitType::Ranger => false,
        }
    }

    /// Can this type start or continue capturing a building?
    #[must_use]
    pub const fn can_capture(self) -> bool {
        match self {
            UnitType::Infantry | UnitType::Ranger => true,
            UnitType::Tank => false,
        }
    }

    /// Can this type attack in a turn in which it has already moved?
    #[must_use]
    pub const fn can_attack_after_move(self) -> bool {
        match self {
            UnitType::Infantry | UnitType::Tank => true,
            UnitType::Ranger => false,
        }
    }

    /// Does this type get extra movement when it starts on a road?
    #[must_use]
    pub const fn gets_road_bonus(self) -> bool {
        match self {
            UnitType::Tank | UnitType::Ranger => true,
            UnitType::Infantry => false,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            UnitType::Infantry => "Infantry",
            UnitType::Tank => "Tank",
            UnitType::Ranger => "Ranger",
        }
    }
}

impl std::fmt::Display for UnitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mountain_traversal() {
        assert!(UnitType::Infantry.can_traverse_mountains());
        assert!(!UnitType::Tank.can_traverse_mountains());
        assert!(!UnitType::Ranger.can_traverse_mountains());
    }

    #[test]
    fn test_capture_capability() {
        assert!(UnitType::Infantry.can_capture());
        assert!(UnitType::Ranger.can_capture());
        assert!(!UnitType::Tank.can_capture());
    }

    #[test]
    fn test_attack_after_move() {
        assert!(UnitType::Infantry.can_attack_after_move());
        assert!(UnitType::Tank.can_attack_after_move());
        assert!(!UnitType::Ranger.can_attack_after_move());
    }

    #[test]
    fn test_road_bonus() {
        assert!(!UnitType::Infantry.gets_road_bonus());
        assert!(UnitType::Tank.gets_road_bonus());
        assert!(UnitType::Ranger.gets_road_bonus());
    }

    #[test]
    fn test_tag_order() {
        assert!(UnitType::Infantry < UnitType::Tank);
        assert!(UnitType::Tank < UnitType::Ranger);
        assert_eq!(UnitType::ALL.len(), 3);
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&UnitType::Ranger).unwrap();
        assert_eq!(json, "\"Ranger\"");
        let back: UnitType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, UnitType::Ranger);
    }
}
