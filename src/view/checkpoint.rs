//! Binary checkpoints of full game state.
//!
//! A checkpoint is the whole `Game` (history included) encoded with
//! bincode. Restoring through the engine also runs the invariant checker,
//! so a corrupted or hand-edited checkpoint is refused instead of loaded.

use thiserror::Error;

use crate::core::entity::GameId;
use crate::state::{Game, InvariantViolation};

/// Checkpoint encode/decode failures.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to encode checkpoint: {0}")]
    Encode(#[source] bincode::Error),

    #[error("failed to decode checkpoint: {0}")]
    Decode(#[source] bincode::Error),

    #[error("checkpoint is inconsistent: {0}")]
    Inconsistent(InvariantViolation),

    #[error("{0} does not exist")]
    GameNotFound(GameId),
}

impl Game {
    /// Encode the full game state.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(SnapshotError::Encode)
    }

    /// Decode a game encoded by `to_bytes`. Performs no consistency checks.
    pub fn from_bytes(bytes: &[u8]) -> Result<Game, SnapshotError> {
        bincode::deserialize(bytes).map_err(SnapshotError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::Action;
    use crate::core::config::RulesConfig;
    use crate::core::entity::{GameId, MapId, UnitId};
    use crate::core::player::PlayerId;
    use crate::core::position::path;
    use crate::map::{BuildingKind, MapTemplate};
    use crate::units::UnitType;

    #[test]
    fn test_checkpoint_preserves_state() {
        let map = MapTemplate::new("cp", 5, 5)
            .with_building((0, 0), BuildingKind::HQ, Some(PlayerId::new(1)))
            .with_building((4, 4), BuildingKind::HQ, Some(PlayerId::new(2)))
            .with_building((2, 2), BuildingKind::Factory, None)
            .with_unit((1, 1), PlayerId::new(2), UnitType::Tank);
        let mut game = Game::from_template(GameId(9), MapId(2), &map, &RulesConfig::default(), false);
        game.building_mut((2, 2).into()).unwrap().capture_progress = 1;
        game.building_mut((2, 2).into()).unwrap().capture_player = Some(PlayerId::new(2));
        game.record(
            PlayerId::new(2),
            Action::Move { unit: UnitId(1), path: path(&[(1, 2)]) },
            1,
        );

        let bytes = game.to_bytes().unwrap();
        let restored = Game::from_bytes(&bytes).unwrap();

        assert_eq!(restored, game);
        assert_eq!(restored.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            Game::from_bytes(&[1, 2, 3]),
            Err(SnapshotError::Decode(_))
        ));
    }
}
