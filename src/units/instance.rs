//! Unit instances - runtime unit state.
//!
//! `Unit` is a specific unit on the board. Dead units are never removed:
//! `alive` gates every query, and the record stays for post-game scoring.

use serde::{Deserialize, Serialize};

use super::definition::UnitType;
use crate::core::entity::UnitId;
use crate::core::player::PlayerId;
use crate::core::position::Position;

/// A unit in a game.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    /// Unique (per game) id.
    pub id: UnitId,

    /// Owning player slot.
    pub owner: PlayerId,

    /// Unit type.
    pub unit_type: UnitType,

    /// Current cell. Stale once the unit is dead.
    pub position: Position,

    /// Remaining hit points; 0 once dead.
    pub hp: u8,

    /// Moved during its owner's current turn.
    pub has_moved: bool,

    /// Attacked, captured or waited during its owner's current turn.
    pub has_acted: bool,

    /// Dead units stay in the table with `alive == false`.
    pub alive: bool,
}

impl Unit {
    /// Create a fresh unit at full health, ready to act.
    #[must_use]
    pub fn new(id: UnitId, owner: PlayerId, unit_type: UnitType, position: Position, hp: u8) -> Self {
        Self {
            id,
            owner,
            unit_type,
            position,
            hp,
            has_moved: false,
            has_acted: false,
            alive: true,
        }
    }

    /// Has this unit reached a terminal state for the turn?
    ///
    /// Waiting sets both flags, so this also covers waited units.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.has_moved || self.has_acted
    }

    /// Clear per-turn flags at the start of the owner's turn.
    pub fn reset_turn_flags(&mut self) {
        self.has_moved = false;
        self.has_acted = false;
    }

    /// Mark the unit as finished for the turn.
    pub fn exhaust(&mut self) {
        self.has_moved = true;
        self.has_acted = true;
    }

    /// Apply damage. Returns `true` if this killed the unit.
    pub fn take_damage(&mut self, damage: u8) -> bool {
        self.hp = self.hp.saturating_sub(damage);
        if self.hp == 0 && self.alive {
            self.alive = false;
            return true;
        }
        false
    }
}
