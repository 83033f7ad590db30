//! Engine error taxonomy.
//!
//! Every rejected action is reported with the rule it broke and the entity
//! involved. `EngineError::kind` groups variants into the four families
//! callers usually branch on.

use thiserror::Error;

use super::entity::{AccountId, GameId, MapId, UnitId};
use super::player::PlayerId;
use super::position::Position;
use crate::map::{MapError, Terrain};
use crate::state::GameStatus;
use crate::units::UnitType;

/// Broad family of an `EngineError`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller may not touch this turn, unit, building or game.
    Authorization,
    /// The entity is not in a state that allows the action.
    Precondition,
    /// The action's arguments break a movement or combat rule.
    Validation,
    /// The game, map or lobby is not in a state that allows the action.
    State,
}

/// A rejected action. State is untouched whenever one is returned.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    // === Authorization ===
    #[error("it is not {caller}'s turn (current player is {current})")]
    NotYourTurn { caller: AccountId, current: PlayerId },

    #[error("{unit} belongs to {owner}, not {player}")]
    NotYourUnit { unit: UnitId, owner: PlayerId, player: PlayerId },

    #[error("building at {position} is not owned by {player}")]
    NotYourBuilding { position: Position, player: PlayerId },

    #[error("{caller} holds no live slot in {game}")]
    NotInGame { caller: AccountId, game: GameId },

    // === Precondition ===
    #[error("{0} does not exist")]
    UnitNotFound(UnitId),

    #[error("{0} is dead")]
    UnitDead(UnitId),

    #[error("{0} has already moved this turn")]
    AlreadyMoved(UnitId),

    #[error("{0} has already acted this turn")]
    AlreadyActed(UnitId),

    #[error("{unit} ({unit_type}) cannot attack after moving")]
    CannotAttackAfterMove { unit: UnitId, unit_type: UnitType },

    #[error("{unit} ({unit_type}) cannot capture buildings")]
    CannotCapture { unit: UnitId, unit_type: UnitType },

    #[error("{unit} cannot attack {target}: same owner")]
    FriendlyTarget { unit: UnitId, target: UnitId },

    #[error("no building at {0}")]
    NoBuilding(Position),

    #[error("building at {0} is not a factory")]
    NotAFactory(Position),

    #[error("building at {position} already belongs to {player}")]
    AlreadyOwned { position: Position, player: PlayerId },

    #[error("factory at {0} already has a unit queued")]
    QueueOccupied(Position),

    #[error("insufficient gold: need {needed}, have {available}")]
    InsufficientGold { needed: u32, available: u32 },

    #[error("units {units:?} have not moved, acted or waited")]
    UnitsNotReady { units: Vec<UnitId> },

    // === Validation ===
    #[error("movement path is empty")]
    EmptyPath,

    #[error("step from {from} to {to} is not orthogonally adjacent")]
    NotAdjacent { from: Position, to: Position },

    #[error("{0} is off the board")]
    OutOfBounds(Position),

    #[error("{unit_type} cannot enter {terrain:?} at {position}")]
    Impassable { position: Position, terrain: Terrain, unit_type: UnitType },

    #[error("path costs {cost}, more than the budget of {budget}")]
    MoveBudgetExceeded { cost: u16, budget: u16 },

    #[error("{position} is occupied by {occupant}")]
    TileOccupied { position: Position, occupant: UnitId },

    #[error("target at distance {distance} is outside range {min}..={max}")]
    OutOfRange { distance: u16, min: u8, max: u8 },

    // === State ===
    #[error("{0} does not exist")]
    GameNotFound(GameId),

    #[error("{0} does not exist")]
    MapNotFound(MapId),

    #[error("{game} is {actual:?}, expected {expected:?}")]
    WrongStatus { game: GameId, expected: GameStatus, actual: GameStatus },

    #[error("{slot} is not a slot of a {player_count}-player game")]
    InvalidSlot { slot: PlayerId, player_count: u8 },

    #[error("{0} is already taken")]
    SlotTaken(PlayerId),

    #[error("{caller} already holds {slot}")]
    AlreadyJoined { caller: AccountId, slot: PlayerId },

    #[error("invalid map template: {0}")]
    InvalidMap(#[from] MapError),

    // === Batches ===
    #[error("action {index} of the batch was rejected: {source}")]
    Batch {
        index: usize,
        #[source]
        source: Box<EngineError>,
    },
}

impl EngineError {
    /// Which family this error belongs to. Batch errors report the family
    /// of the action that failed.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::NotYourTurn { .. }
            | EngineError::NotYourUnit { .. }
            | EngineError::NotYourBuilding { .. }
            | EngineError::NotInGame { .. } => ErrorKind::Authorization,

            EngineError::UnitNotFound(_)
            | EngineError::UnitDead(_)
            | EngineError::AlreadyMoved(_)
            | EngineError::AlreadyActed(_)
            | EngineError::CannotAttackAfterMove { .. }
            | EngineError::CannotCapture { .. }
            | EngineError::FriendlyTarget { .. }
            | EngineError::NoBuilding(_)
            | EngineError::NotAFactory(_)
            | EngineError::AlreadyOwned { .. }
            | EngineError::QueueOccupied(_)
            | EngineError::InsufficientGold { .. }
            | EngineError::UnitsNotReady { .. } => ErrorKind::Precondition,

            EngineError::EmptyPath
            | EngineError::NotAdjacent { .. }
            | EngineError::OutOfBounds(_)
            | EngineError::Impassable { .. }
            | EngineError::MoveBudgetExceeded { .. }
            | EngineError::TileOccupied { .. }
            | EngineError::OutOfRange { .. } => ErrorKind::Validation,

            EngineError::GameNotFound(_)
            | EngineError::MapNotFound(_)
            | EngineError::WrongStatus { .. }
            | EngineError::InvalidSlot { .. }
            | EngineError::SlotTaken(_)
            | EngineError::AlreadyJoined { .. }
            | EngineError::InvalidMap(_) => ErrorKind::State,

            EngineError::Batch { source, .. } => source.kind(),
        }
    }

    /// The innermost error, looking through batch wrappers.
    #[must_use]
    pub fn root(&self) -> &EngineError {
        match self {
            EngineError::Batch { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            EngineError::NotYourTurn { caller: AccountId(1), current: PlayerId(2) }.kind(),
            ErrorKind::Authorization
        );
        assert_eq!(EngineError::AlreadyMoved(UnitId(1)).kind(), ErrorKind::Precondition);
        assert_eq!(EngineError::EmptyPath.kind(), ErrorKind::Validation);
        assert_eq!(EngineError::SlotTaken(PlayerId(1)).kind(), ErrorKind::State);
    }

    #[test]
    fn test_batch_reports_inner_kind() {
        let err = EngineError::Batch {
            index: 2,
            source: Box::new(EngineError::OutOfBounds(Position::new(9, 9))),
        };
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.root(), &EngineError::OutOfBounds(Position::new(9, 9)));
        assert!(err.to_string().contains("action 2"));
    }

    #[test]
    fn test_messages_name_the_entity() {
        let err = EngineError::InsufficientGold { needed: 4, available: 1 };
        assert_eq!(err.to_string(), "insufficient gold: need 4, have 1");

        let err = EngineError::TileOccupied { position: Position::new(1, 2), occupant: UnitId(7) };
        assert_eq!(err.to_string(), "(1, 2) is occupied by Unit(7)");
    }
}
