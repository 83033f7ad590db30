//! Player actions and transactions.
//!
//! An `Action` is one in-game order. Actions reach the engine inside a
//! `Transaction`: an ordered batch from one caller against one game, with
//! a seed that drives every combat roll in the batch. A transaction is
//! applied all-or-nothing.
//!
//! ## Example
//!
//! ```
//! use grid_tactics::core::{path, AccountId, Action, GameId, Transaction, UnitId};
//!
//! let tx = Transaction::new(AccountId(1), GameId(1), 0xdead_beef)
//!     .with(Action::Move { unit: UnitId(1), path: path(&[(1, 0), (2, 0)]) })
//!     .with(Action::Wait { unit: UnitId(1) })
//!     .with(Action::EndTurn);
//! assert_eq!(tx.actions.len(), 3);
//! ```

use serde::{Deserialize, Serialize};

use super::entity::{AccountId, GameId, UnitId};
use super::player::PlayerId;
use super::position::{Path, Position};
use crate::units::UnitType;

/// A single in-game order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Walk a unit along `path` (start cell excluded).
    Move { unit: UnitId, path: Path },
    /// Strike `target` with `unit`.
    Attack { unit: UnitId, target: UnitId },
    /// Advance capture of the building under `unit`.
    Capture { unit: UnitId },
    /// End `unit`'s turn without acting.
    Wait { unit: UnitId },
    /// Queue a unit at an owned factory.
    Build { factory: Position, unit_type: UnitType },
    /// Hand the turn to the next player.
    EndTurn,
    /// Leave the game.
    Resign,
}

impl Action {
    /// Short name of the action, for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Action::Move { .. } => "move",
            Action::Attack { .. } => "attack",
            Action::Capture { .. } => "capture",
            Action::Wait { .. } => "wait",
            Action::Build { .. } => "build",
            Action::EndTurn => "end_turn",
            Action::Resign => "resign",
        }
    }

    /// The unit this action orders, if any.
    #[must_use]
    pub fn unit(&self) -> Option<UnitId> {
        match self {
            Action::Move { unit, .. }
            | Action::Attack { unit, .. }
            | Action::Capture { unit }
            | Action::Wait { unit } => Some(*unit),
            Action::Build { .. } | Action::EndTurn | Action::Resign => None,
        }
    }
}

/// An ordered batch of actions, applied all-or-nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Who submits the batch.
    pub caller: AccountId,
    /// Target game.
    pub game: GameId,
    /// Transaction-scoped randomness; see `GameRng::for_action`.
    pub seed: u64,
    /// Actions in execution order.
    pub actions: Vec<Action>,
}

impl Transaction {
    /// Create an empty transaction.
    #[must_use]
    pub fn new(caller: AccountId, game: GameId, seed: u64) -> Self {
        Self {
            caller,
            game,
            seed,
            actions: Vec::new(),
        }
    }

    /// Append an action.
    #[must_use]
    pub fn with(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }
}

/// A recorded action with metadata for history tracking.
///
/// Used for:
/// - Replay/debugging
/// - Presentation layers rebuilding a turn
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The slot that took this action.
    pub player: PlayerId,

    /// The action taken.
    pub action: Action,

    /// Round in which the action was taken.
    pub round: u32,

    /// Game-wide sequence number (for ordering).
    pub sequence: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(player: PlayerId, action: Action, round: u32, sequence: u32) -> Self {
        Self {
            player,
            action,
            round,
            sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::position::path;

    #[test]
    fn test_action_unit() {
        assert_eq!(Action::Wait { unit: UnitId(4) }.unit(), Some(UnitId(4)));
        assert_eq!(Action::Attack { unit: UnitId(1), target: UnitId(2) }.unit(), Some(UnitId(1)));
        assert_eq!(Action::EndTurn.unit(), None);
        assert_eq!(
            Action::Build { factory: Position::new(0, 0), unit_type: UnitType::Tank }.unit(),
            None
        );
    }

    #[test]
    fn test_action_names() {
        assert_eq!(Action::Resign.name(), "resign");
        assert_eq!(Action::Capture { unit: UnitId(1) }.name(), "capture");
    }

    #[test]
    fn test_transaction_builder() {
        let tx = Transaction::new(AccountId(9), GameId(3), 7)
            .with(Action::Wait { unit: UnitId(1) })
            .with(Action::EndTurn);

        assert_eq!(tx.caller, AccountId(9));
        assert_eq!(tx.game, GameId(3));
        assert_eq!(tx.actions, vec![Action::Wait { unit: UnitId(1) }, Action::EndTurn]);
    }

    #[test]
    fn test_action_serialization() {
        let action = Action::Move { unit: UnitId(5), path: path(&[(1, 1), (1, 2)]) };
        let json = serde_json::to_string(&action).unwrap();
        let deserialized: Action = serde_json::from_str(&json).unwrap();

        assert_eq!(action, deserialized);
    }

    #[test]
    fn test_action_record_serialization() {
        let record = ActionRecord::new(PlayerId::new(2), Action::EndTurn, 4, 17);

        let json = serde_json::to_string(&record).unwrap();
        let deserialized: ActionRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record, deserialized);
    }
}
