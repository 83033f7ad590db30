//! Per-player slot state and buildings.

use serde::{Deserialize, Serialize};

use crate::core::entity::AccountId;
use crate::core::player::PlayerId;
use crate::core::position::Position;
use crate::map::BuildingKind;
use crate::units::UnitType;

/// One player position within a game.
///
/// The counts are caches maintained by the rules (spawn, death, capture)
/// and cross-checked by `check_invariants`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerSlot {
    /// Identity controlling this slot; `None` until someone joins.
    pub controller: Option<AccountId>,
    pub gold: u32,
    /// Alive units owned.
    pub unit_count: u32,
    pub factory_count: u32,
    pub city_count: u32,
    pub hq_count: u32,
    /// Cleared by elimination or resignation, never set again.
    pub alive: bool,
}

impl PlayerSlot {
    /// An unclaimed slot holding `gold`.
    #[must_use]
    pub fn new(gold: u32) -> Self {
        Self {
            controller: None,
            gold,
            unit_count: 0,
            factory_count: 0,
            city_count: 0,
            hq_count: 0,
            alive: true,
        }
    }

    /// Count of buildings of `kind` owned.
    #[must_use]
    pub fn building_count(&self, kind: BuildingKind) -> u32 {
        match kind {
            BuildingKind::City => self.city_count,
            BuildingKind::Factory => self.factory_count,
            BuildingKind::HQ => self.hq_count,
        }
    }

    pub(crate) fn building_count_mut(&mut self, kind: BuildingKind) -> &mut u32 {
        match kind {
            BuildingKind::City => &mut self.city_count,
            BuildingKind::Factory => &mut self.factory_count,
            BuildingKind::HQ => &mut self.hq_count,
        }
    }

    /// No units, no factories, no gold: nothing left to play with.
    #[must_use]
    pub fn is_spent(&self) -> bool {
        self.unit_count == 0 && self.factory_count == 0 && self.gold == 0
    }
}

/// A capturable building on the board.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Building {
    pub position: Position,
    pub kind: BuildingKind,
    /// `None` is neutral.
    pub owner: Option<PlayerId>,
    /// Player currently capturing, if any.
    pub capture_player: Option<PlayerId>,
    /// Capture ticks so far; 0 whenever `capture_player` is `None`.
    pub capture_progress: u8,
    /// Unit waiting to be produced (factories only).
    pub queue: Option<UnitType>,
}

impl Building {
    #[must_use]
    pub fn new(position: Position, kind: BuildingKind, owner: Option<PlayerId>) -> Self {
        Self {
            position,
            kind,
            owner,
            capture_player: None,
            capture_progress: 0,
            queue: None,
        }
    }

    /// Drop any capture in progress.
    pub fn reset_capture(&mut self) {
        self.capture_player = None;
        self.capture_progress = 0;
    }

    #[must_use]
    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.owner == Some(player)
    }
}
