//! Rules configuration.
//!
//! `RulesConfig` collects every tunable number of the game: unit stats,
//! economy, combat modifiers and the round limit. Capabilities (who can
//! capture, who can cross mountains, ...) are not configurable; see
//! `UnitType`.
//!
//! Partial JSON is accepted: missing fields take their defaults.
//!
//! ```
//! use grid_tactics::core::RulesConfig;
//!
//! let config = RulesConfig::from_json(r#"{ "max_rounds": 20 }"#).unwrap();
//! assert_eq!(config.max_rounds, 20);
//! assert_eq!(config.capture_threshold, 2);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::units::UnitType;

/// Numeric stats of one unit type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitStats {
    /// Hit points at spawn.
    pub hp: u8,
    /// Damage dealt on a hit, before terrain defense.
    pub attack: u8,
    /// Movement points per turn.
    pub move_range: u8,
    /// Nearest attackable distance (Manhattan).
    pub min_range: u8,
    /// Farthest attackable distance (Manhattan).
    pub max_range: u8,
    /// Base hit chance in percent.
    pub accuracy: u8,
    /// Gold cost to queue at a factory.
    pub cost: u32,
}

impl UnitStats {
    /// Is `distance` inside this unit's attack band?
    #[must_use]
    pub fn in_range(&self, distance: u16) -> bool {
        u16::from(self.min_range) <= distance && distance <= u16::from(self.max_range)
    }

    /// Does this unit have more than one attack distance?
    #[must_use]
    pub fn has_variable_range(&self) -> bool {
        self.max_range > self.min_range
    }
}

/// Rules configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Infantry stats.
    pub infantry: UnitStats,
    /// Tank stats.
    pub tank: UnitStats,
    /// Ranger stats.
    pub ranger: UnitStats,

    /// Gold each slot holds when the game is created.
    pub starting_gold: u32,
    /// Income for holding at least one HQ.
    pub hq_income: u32,
    /// Income per owned City.
    pub city_income: u32,

    /// Consecutive captures needed to take a building.
    pub capture_threshold: u8,
    /// The game resolves by score once `round` exceeds this.
    pub max_rounds: u32,

    /// Lower clamp of the hit chance, in percent.
    pub min_hit_chance: u8,
    /// Upper clamp of the hit chance, in percent.
    pub max_hit_chance: u8,
    /// Hit-chance penalty when the attacker moved this turn.
    pub moved_penalty: u8,
    /// Hit-chance penalty when striking at the far end of a variable range.
    pub far_range_penalty: u8,

    /// Extra movement for road-bonus types starting on a road.
    pub road_bonus: u8,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            infantry: UnitStats {
                hp: 3,
                attack: 2,
                move_range: 4,
                min_range: 1,
                max_range: 1,
                accuracy: 90,
                cost: 1,
            },
            tank: UnitStats {
                hp: 5,
                attack: 4,
                move_range: 2,
                min_range: 1,
                max_range: 1,
                accuracy: 85,
                cost: 4,
            },
            ranger: UnitStats {
                hp: 3,
                attack: 3,
                move_range: 3,
                min_range: 2,
                max_range: 3,
                accuracy: 88,
                cost: 2,
            },
            starting_gold: 5,
            hq_income: 1,
            city_income: 1,
            capture_threshold: 2,
            max_rounds: 30,
            min_hit_chance: 75,
            max_hit_chance: 95,
            moved_penalty: 5,
            far_range_penalty: 5,
            road_bonus: 2,
        }
    }
}

/// Configuration problems found by `RulesConfig::validate`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{unit_type} must have at least 1 hp")]
    ZeroHp { unit_type: UnitType },

    #[error("{unit_type} has attack range {min}..={max}; ranges must satisfy 1 <= min <= max")]
    BadRange { unit_type: UnitType, min: u8, max: u8 },

    #[error("hit chance clamp {min}..={max} must satisfy min <= max <= 100")]
    BadHitChance { min: u8, max: u8 },

    #[error("capture threshold must be at least 1")]
    ZeroCaptureThreshold,

    #[error("max rounds must be at least 1")]
    ZeroMaxRounds,

    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl RulesConfig {
    /// Stats of a unit type.
    #[must_use]
    pub fn stats(&self, unit_type: UnitType) -> &UnitStats {
        match unit_type {
            UnitType::Infantry => &self.infantry,
            UnitType::Tank => &self.tank,
            UnitType::Ranger => &self.ranger,
        }
    }

    /// Mutable stats of a unit type.
    pub fn stats_mut(&mut self, unit_type: UnitType) -> &mut UnitStats {
        match unit_type {
            UnitType::Infantry => &mut self.infantry,
            UnitType::Tank => &mut self.tank,
            UnitType::Ranger => &mut self.ranger,
        }
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RulesConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for unit_type in UnitType::ALL {
            let stats = self.stats(unit_type);
            if stats.hp == 0 {
                return Err(ConfigError::ZeroHp { unit_type });
            }
            if stats.min_range == 0 || stats.min_range > stats.max_range {
                return Err(ConfigError::BadRange {
                    unit_type,
                    min: stats.min_range,
                    max: stats.max_range,
                });
            }
        }
        if self.min_hit_chance > self.max_hit_chance || self.max_hit_chance > 100 {
            return Err(ConfigError::BadHitChance {
                min: self.min_hit_chance,
                max: self.max_hit_chance,
            });
        }
        if self.capture_threshold == 0 {
            return Err(ConfigError::ZeroCaptureThreshold);
        }
        if self.max_rounds == 0 {
            return Err(ConfigError::ZeroMaxRounds);
        }
        Ok(())
    }

    /// Create a new config with a custom round limit.
    #[must_use]
    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = rounds;
        self
    }

    /// Create a new config with custom starting gold.
    #[must_use]
    pub fn with_starting_gold(mut self, gold: u32) -> Self {
        self.starting_gold = gold;
        self
    }

    /// Create a new config with a custom capture threshold.
    #[must_use]
    pub fn with_capture_threshold(mut self, threshold: u8) -> Self {
        self.capture_threshold = threshold;
        self
    }

    /// Create a new config with custom stats for one unit type.
    #[must_use]
    pub fn with_stats(mut self, unit_type: UnitType, stats: UnitStats) -> Self {
        *self.stats_mut(unit_type) = stats;
        self
    }
}
