//! Building capture.
//!
//! Each `capture` order from a unit standing on a building adds one tick
//! of progress for its owner. A different player starting over resets the
//! count to 1 for themselves. At `capture_threshold` ticks the building
//! changes hands; taking an HQ wins the game on the spot.
//!
//! Progress left behind when the capturing unit walks off or dies is not
//! cleared right away. `cleanup_stale` clears it at the start of the
//! owner's turn, or of the capturer's own turn for a neutral building.

use tracing::{debug, info};

use super::victory;
use crate::core::config::RulesConfig;
use crate::core::entity::UnitId;
use crate::core::error::{EngineError, Result};
use crate::core::event::{GameEvent, Victory};
use crate::core::player::PlayerId;
use crate::core::position::Position;
use crate::map::BuildingKind;
use crate::state::Game;

/// Advance capture of the building under `unit_id`.
pub fn capture(
    game: &mut Game,
    config: &RulesConfig,
    player: PlayerId,
    unit_id: UnitId,
) -> Result<Vec<GameEvent>> {
    let unit = super::owned_unit(game, player, unit_id)?;
    if !unit.unit_type.can_capture() {
        return Err(EngineError::CannotCapture {
            unit: unit_id,
            unit_type: unit.unit_type,
        });
    }
    if unit.has_acted {
        return Err(EngineError::AlreadyActed(unit_id));
    }

    let position = unit.position;
    let building = game
        .building(position)
        .ok_or(EngineError::NoBuilding(position))?;
    if building.is_owned_by(player) {
        return Err(EngineError::AlreadyOwned { position, player });
    }

    if let Some(unit) = game.unit_mut(unit_id) {
        unit.has_acted = true;
    }

    let mut progress = 0;
    if let Some(building) = game.building_mut(position) {
        if building.capture_player == Some(player) {
            building.capture_progress = building.capture_progress.saturating_add(1);
        } else {
            building.capture_player = Some(player);
            building.capture_progress = 1;
        }
        progress = building.capture_progress;
    }

    if progress < config.capture_threshold {
        debug!(%position, %player, progress, "capture progress");
        return Ok(vec![GameEvent::CaptureProgress {
            position,
            player,
            progress,
        }]);
    }

    Ok(transfer(game, position, player))
}

/// Hand the building at `position` to `player` and settle the fallout.
fn transfer(game: &mut Game, position: Position, player: PlayerId) -> Vec<GameEvent> {
    let Some(building) = game.building_mut(position) else {
        return Vec::new();
    };
    let kind = building.kind;
    let previous_owner = building.owner.replace(player);
    building.reset_capture();
    building.queue = None;

    if let Some(slot) = previous_owner.and_then(|p| game.slot_mut(p)) {
        let count = slot.building_count_mut(kind);
        *count = count.saturating_sub(1);
    }
    if let Some(slot) = game.slot_mut(player) {
        *slot.building_count_mut(kind) += 1;
    }

    info!(game = %game.id, %position, %kind, %player, "building captured");

    let mut events = vec![GameEvent::BuildingCaptured {
        position,
        kind,
        player,
        previous_owner,
    }];

    if kind == BuildingKind::HQ {
        game.finish(Some(player));
        info!(game = %game.id, winner = %player, "HQ captured");
        events.push(GameEvent::GameOver {
            winner: Some(player),
            reason: Victory::HqCaptured,
        });
    } else {
        events.extend(victory::check_elimination(game));
    }

    events
}

/// Clear stale capture progress at the start of `player`'s turn.
///
/// Looks at buildings `player` owns, and at neutral buildings `player` is
/// capturing. Progress survives only while a unit of the capturing player
/// still stands on the building.
pub fn cleanup_stale(game: &mut Game, player: PlayerId) -> Vec<GameEvent> {
    let stale: Vec<(Position, PlayerId)> = game
        .buildings
        .values()
        .filter_map(|b| {
            let capturer = b.capture_player?;
            let due = match b.owner {
                Some(owner) => owner == player,
                None => capturer == player,
            };
            let held = game.unit_at(b.position).is_some_and(|u| u.owner == capturer);
            (due && !held).then_some((b.position, capturer))
        })
        .collect();

    let mut events = Vec::with_capacity(stale.len());
    for (position, capturer) in stale {
        if let Some(building) = game.building_mut(position) {
            building.reset_capture();
        }
        debug!(%position, %capturer, "stale capture reset");
        events.push(GameEvent::CaptureReset {
            position,
            player: capturer,
        });
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::{GameId, MapId};
    use crate::map::MapTemplate;
    use crate::state::GameStatus;
    use crate::units::UnitType;

    fn p(n: u8) -> PlayerId {
        PlayerId::new(n)
    }

    fn board() -> Game {
        let map = MapTemplate::new("cap", 5, 5)
            .with_building((0, 0), BuildingKind::HQ, Some(p(1)))
            .with_building((4, 4), BuildingKind::HQ, Some(p(2)))
            .with_building((2, 2), BuildingKind::City, None)
            .with_building((3, 3), BuildingKind::Factory, Some(p(2)))
            .with_unit((2, 2), p(1), UnitType::Infantry)
            .with_unit((3, 3), p(1), UnitType::Ranger)
            .with_unit((4, 3), p(1), UnitType::Tank)
            .with_unit((1, 1), p(2), UnitType::Infantry);
        let mut game = Game::from_template(GameId(1), MapId(1), &map, &RulesConfig::default(), false);
        game.status = GameStatus::Playing;
        game.round = 1;
        game
    }

    fn refresh(game: &mut Game, id: u32) {
        game.unit_mut(UnitId(id)).unwrap().reset_turn_flags();
    }

    #[test]
    fn test_two_ticks_capture_city() {
        let mut game = board();
        let config = RulesConfig::default();
        let city = Position::new(2, 2);

        let events = capture(&mut game, &config, p(1), UnitId(1)).unwrap();
        assert_eq!(
            events,
            vec![GameEvent::CaptureProgress { position: city, player: p(1), progress: 1 }]
        );
        assert!(game.unit(UnitId(1)).unwrap().has_acted);

        refresh(&mut game, 1);
        let events = capture(&mut game, &config, p(1), UnitId(1)).unwrap();
        assert!(matches!(events[0], GameEvent::BuildingCaptured { previous_owner: None, .. }));

        let building = game.building(city).unwrap();
        assert_eq!(building.owner, Some(p(1)));
        assert_eq!(building.capture_progress, 0);
        assert_eq!(building.capture_player, None);
        assert_eq!(game.slot(p(1)).unwrap().city_count, 1);
    }

    #[test]
    fn test_cannot_capture_twice_per_turn() {
        let mut game = board();
        let config = RulesConfig::default();
        capture(&mut game, &config, p(1), UnitId(1)).unwrap();

        assert_eq!(
            capture(&mut game, &config, p(1), UnitId(1)),
            Err(EngineError::AlreadyActed(UnitId(1)))
        );
    }

    #[test]
    fn test_tank_cannot_capture() {
        let mut game = board();
        assert!(matches!(
            capture(&mut game, &RulesConfig::default(), p(1), UnitId(3)),
            Err(EngineError::CannotCapture { .. })
        ));
    }

    #[test]
    fn test_no_building() {
        let mut game = board();
        assert_eq!(
            capture(&mut game, &RulesConfig::default(), p(2), UnitId(4)),
            Err(EngineError::NoBuilding(Position::new(1, 1)))
        );
    }

    #[test]
    fn test_new_capturer_restarts_at_one() {
        let mut game = board();
        let city = Position::new(2, 2);
        {
            let building = game.building_mut(city).unwrap();
            building.capture_player = Some(p(2));
            building.capture_progress = 1;
        }

        capture(&mut game, &RulesConfig::default(), p(1), UnitId(1)).unwrap();

        let building = game.building(city).unwrap();
        assert_eq!(building.capture_player, Some(p(1)));
        assert_eq!(building.capture_progress, 1);
    }

    #[test]
    fn test_factory_capture_moves_counts_and_clears_queue() {
        let mut game = board();
        let config = RulesConfig::default();
        let factory = Position::new(3, 3);
        game.building_mut(factory).unwrap().queue = Some(UnitType::Tank);

        capture(&mut game, &config, p(1), UnitId(2)).unwrap();
        refresh(&mut game, 2);
        capture(&mut game, &config, p(1), UnitId(2)).unwrap();

        let building = game.building(factory).unwrap();
        assert_eq!(building.owner, Some(p(1)));
        assert_eq!(building.queue, None);
        assert_eq!(game.slot(p(1)).unwrap().factory_count, 1);
        assert_eq!(game.slot(p(2)).unwrap().factory_count, 0);
    }

    #[test]
    fn test_hq_capture_wins() {
        let mut game = board();
        let config = RulesConfig::default().with_capture_threshold(1);
        let hq = Position::new(4, 4);
        let id = game.spawn_unit(p(1), UnitType::Infantry, Position::new(2, 0), 3);
        game.spatial.relocate(Position::new(2, 0), hq);
        game.unit_mut(id).unwrap().position = hq;

        let events = capture(&mut game, &config, p(1), id).unwrap();

        assert_eq!(game.status, GameStatus::Finished);
        assert_eq!(game.winner, Some(p(1)));
        assert_eq!(
            events.last(),
            Some(&GameEvent::GameOver { winner: Some(p(1)), reason: Victory::HqCaptured })
        );
    }

    #[test]
    fn test_own_building_rejected() {
        let mut game = board();
        let id = game.spawn_unit(p(1), UnitType::Infantry, Position::new(0, 0), 3);
        assert!(matches!(
            capture(&mut game, &RulesConfig::default(), p(1), id),
            Err(EngineError::AlreadyOwned { .. })
        ));
    }

    #[test]
    fn test_stale_progress_on_owned_building() {
        let mut game = board();
        let factory = Position::new(3, 3);
        capture(&mut game, &RulesConfig::default(), p(1), UnitId(2)).unwrap();

        // Ranger still on the factory: nothing to clear.
        assert!(cleanup_stale(&mut game, p(2)).is_empty());

        game.spatial.relocate(factory, Position::new(3, 2));
        game.unit_mut(UnitId(2)).unwrap().position = Position::new(3, 2);

        // Not the owner's turn: progress survives.
        assert!(cleanup_stale(&mut game, p(1)).is_empty());
        assert_eq!(game.building(factory).unwrap().capture_progress, 1);

        let events = cleanup_stale(&mut game, p(2));
        assert_eq!(events, vec![GameEvent::CaptureReset { position: factory, player: p(1) }]);
        assert_eq!(game.building(factory).unwrap().capture_progress, 0);
    }

    #[test]
    fn test_stale_progress_on_neutral_building() {
        let mut game = board();
        let city = Position::new(2, 2);
        capture(&mut game, &RulesConfig::default(), p(1), UnitId(1)).unwrap();

        game.spatial.relocate(city, Position::new(2, 1));
        game.unit_mut(UnitId(1)).unwrap().position = Position::new(2, 1);

        // A neutral building has no owner turn; the capturer's turn clears it.
        assert!(cleanup_stale(&mut game, p(2)).is_empty());
        assert_eq!(cleanup_stale(&mut game, p(1)).len(), 1);
        assert_eq!(game.building(city).unwrap().capture_player, None);
    }
}
