//! Game events.
//!
//! Every accepted action reports what it changed as a list of
//! `GameEvent`s, in the order the changes happened. Presentation and
//! indexing layers replay these instead of diffing snapshots.

use serde::{Deserialize, Serialize};

use super::entity::UnitId;
use super::player::PlayerId;
use super::position::Position;
use crate::map::BuildingKind;
use crate::units::UnitType;

/// Outcome of a single strike (initial attack or counterattack).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Strike {
    /// Unit that struck.
    pub attacker: UnitId,
    /// Unit that was struck.
    pub defender: UnitId,
    /// Clamped hit chance in percent.
    pub hit_chance: u8,
    /// The percentile roll drawn, `1..=100`.
    pub roll: u8,
    /// `roll <= hit_chance`.
    pub hit: bool,
    /// Damage applied (full on a hit, graze or nothing on a miss).
    pub damage: u8,
    /// Defender hp after the strike.
    pub defender_hp: u8,
}

/// How a finished game was decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Victory {
    /// An HQ was captured.
    HqCaptured,
    /// Every other player was eliminated or resigned.
    LastStanding,
    /// The round limit was exceeded; decided by hp + gold.
    Timeout,
}

/// Something that happened while applying an action.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameEvent {
    /// All slots filled; the game is under way.
    GameStarted { player_count: u8 },
    /// A unit walked a path.
    UnitMoved { unit: UnitId, from: Position, to: Position, cost: u16 },
    /// A unit finished its turn without acting.
    UnitWaited { unit: UnitId },
    /// An attack (possibly followed by `Counterattack`).
    Attacked(Strike),
    /// The defender struck back.
    Counterattack(Strike),
    /// A unit reached 0 hp.
    UnitDied { unit: UnitId, owner: PlayerId, position: Position },
    /// Capture advanced without completing.
    CaptureProgress { position: Position, player: PlayerId, progress: u8 },
    /// A building changed hands.
    BuildingCaptured {
        position: Position,
        kind: BuildingKind,
        player: PlayerId,
        previous_owner: Option<PlayerId>,
    },
    /// Stale capture progress was cleared.
    CaptureReset { position: Position, player: PlayerId },
    /// A unit was queued at a factory.
    UnitQueued { factory: Position, player: PlayerId, unit_type: UnitType, cost: u32 },
    /// A queued unit appeared.
    UnitProduced { unit: UnitId, factory: Position, player: PlayerId, unit_type: UnitType },
    /// A queued unit could not appear because the factory is occupied.
    ProductionBlocked { factory: Position, player: PlayerId },
    /// Start-of-turn income.
    IncomeCredited { player: PlayerId, amount: u32, gold: u32 },
    /// The current player changed.
    TurnStarted { player: PlayerId, round: u32 },
    /// A new round began.
    RoundStarted { round: u32 },
    /// A player resigned.
    PlayerResigned { player: PlayerId },
    /// A player was eliminated (no units, factories or gold).
    PlayerEliminated { player: PlayerId },
    /// The game ended. `winner == None` is a draw.
    GameOver { winner: Option<PlayerId>, reason: Victory },
}
