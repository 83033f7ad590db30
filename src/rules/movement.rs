//! Movement validation.
//!
//! A path lists the cells a unit steps through after leaving its current
//! cell, destination last. Every step must be orthogonal, on the board,
//! enterable by the unit type, affordable and free of other units.
//!
//! ## Road bonus
//!
//! Types with the road bonus that start on a road get `road_bonus` extra
//! movement points. The pool pays for consecutive road steps from the
//! start and is lost at the first step off the road.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::config::RulesConfig;
use crate::core::entity::UnitId;
use crate::core::error::{EngineError, Result};
use crate::core::event::GameEvent;
use crate::core::player::PlayerId;
use crate::core::position::Position;
use crate::map::Terrain;
use crate::state::Game;
use crate::units::Unit;

/// A validated move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub from: Position,
    pub destination: Position,
    /// Total terrain cost of the path.
    pub cost: u16,
    /// Part of `cost` paid by the road bonus.
    pub bonus_used: u16,
}

impl MoveOutcome {
    /// Cost charged against the unit's move range.
    #[must_use]
    pub fn charged(&self) -> u16 {
        self.cost - self.bonus_used
    }
}

/// Check `path` for `unit` without touching the game.
pub fn validate_path(
    game: &Game,
    config: &RulesConfig,
    unit: &Unit,
    path: &[Position],
) -> Result<MoveOutcome> {
    let destination = *path.last().ok_or(EngineError::EmptyPath)?;
    let budget = u16::from(config.stats(unit.unit_type).move_range);

    let start_on_road = game.terrain(unit.position).is_some_and(Terrain::is_road);
    let mut pool = if unit.unit_type.gets_road_bonus() && start_on_road {
        u16::from(config.road_bonus)
    } else {
        0
    };

    let mut previous = unit.position;
    let mut cost = 0u16;
    let mut bonus_used = 0u16;

    for &step in path {
        if !previous.is_adjacent(step) {
            return Err(EngineError::NotAdjacent {
                from: previous,
                to: step,
            });
        }
        let terrain = game.terrain(step).ok_or(EngineError::OutOfBounds(step))?;
        if terrain == Terrain::Mountain && !unit.unit_type.can_traverse_mountains() {
            return Err(EngineError::Impassable {
                position: step,
                terrain,
                unit_type: unit.unit_type,
            });
        }

        let step_cost = u16::from(terrain.move_cost());
        if pool > 0 && terrain.is_road() {
            let covered = pool.min(step_cost);
            pool -= covered;
            bonus_used += covered;
        } else {
            pool = 0;
        }
        cost += step_cost;

        let charged = cost - bonus_used;
        if charged > budget {
            return Err(EngineError::MoveBudgetExceeded {
                cost: charged,
                budget,
            });
        }

        if let Some(occupant) = game.spatial.get(step) {
            if occupant != unit.id {
                return Err(EngineError::TileOccupied {
                    position: step,
                    occupant,
                });
            }
        }

        previous = step;
    }

    Ok(MoveOutcome {
        from: unit.position,
        destination,
        cost,
        bonus_used,
    })
}

/// Move `unit_id` along `path` for `player`.
///
/// Capture progress never advances on a move; the capturing unit has to
/// stay and issue `capture` again.
pub fn move_unit(
    game: &mut Game,
    config: &RulesConfig,
    player: PlayerId,
    unit_id: UnitId,
    path: &[Position],
) -> Result<Vec<GameEvent>> {
    let unit = super::owned_unit(game, player, unit_id)?;
    if unit.has_moved {
        return Err(EngineError::AlreadyMoved(unit_id));
    }
    if unit.has_acted {
        return Err(EngineError::AlreadyActed(unit_id));
    }

    let outcome = validate_path(game, config, &unit, path)?;

    game.spatial.relocate(outcome.from, outcome.destination);
    if let Some(unit) = game.unit_mut(unit_id) {
        unit.position = outcome.destination;
        unit.has_moved = true;
    }

    debug!(
        unit = %unit_id,
        from = %outcome.from,
        to = %outcome.destination,
        cost = outcome.cost,
        bonus = outcome.bonus_used,
        "unit moved"
    );

    Ok(vec![GameEvent::UnitMoved {
        unit: unit_id,
        from: outcome.from,
        to: outcome.destination,
        cost: outcome.cost,
    }])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::{GameId, MapId};
    use crate::core::position::path;
    use crate::map::{BuildingKind, MapTemplate};
    use crate::units::UnitType;

    fn p(n: u8) -> PlayerId {
        PlayerId::new(n)
    }

    /// 6x3 board. Row 0 is road from x=0..=3, mountain at (2, 1).
    fn board(units: &[((u8, u8), u8, UnitType)]) -> Game {
        let mut map = MapTemplate::new("m", 6, 3)
            .with_building((5, 2), BuildingKind::HQ, Some(p(1)))
            .with_building((5, 0), BuildingKind::HQ, Some(p(2)))
            .with_tile((0, 0), Terrain::Road)
            .with_tile((1, 0), Terrain::Road)
            .with_tile((2, 0), Terrain::DirtRoad)
            .with_tile((3, 0), Terrain::Road)
            .with_tile((2, 1), Terrain::Mountain);
        for &(pos, owner, unit_type) in units {
            map = map.with_unit(pos, p(owner), unit_type);
        }
        Game::from_template(GameId(1), MapId(1), &map, &RulesConfig::default(), false)
    }

    fn check(game: &Game, id: u32, steps: &[(u8, u8)]) -> Result<MoveOutcome> {
        let unit = game.unit(UnitId(id)).unwrap().clone();
        validate_path(game, &RulesConfig::default(), &unit, &path(steps))
    }

    #[test]
    fn test_simple_path() {
        let game = board(&[((0, 2), 1, UnitType::Infantry)]);
        let outcome = check(&game, 1, &[(1, 2), (2, 2), (3, 2)]).unwrap();

        assert_eq!(outcome.destination, Position::new(3, 2));
        assert_eq!(outcome.cost, 3);
        assert_eq!(outcome.bonus_used, 0);
    }

    #[test]
    fn test_empty_path() {
        let game = board(&[((0, 2), 1, UnitType::Infantry)]);
        assert_eq!(check(&game, 1, &[]), Err(EngineError::EmptyPath));
    }

    #[test]
    fn test_first_step_must_touch_start() {
        let game = board(&[((0, 2), 1, UnitType::Infantry)]);
        assert!(matches!(
            check(&game, 1, &[(2, 2)]),
            Err(EngineError::NotAdjacent { .. })
        ));
        assert!(matches!(
            check(&game, 1, &[(1, 1)]),
            Err(EngineError::NotAdjacent { .. })
        ));
    }

    #[test]
    fn test_off_board() {
        let game = board(&[((0, 2), 1, UnitType::Infantry)]);
        assert_eq!(
            check(&game, 1, &[(0, 3)]),
            Err(EngineError::OutOfBounds(Position::new(0, 3)))
        );
    }

    #[test]
    fn test_mountains() {
        let game = board(&[((1, 1), 1, UnitType::Infantry), ((1, 2), 1, UnitType::Tank)]);

        let climb = check(&game, 1, &[(2, 1), (3, 1)]).unwrap();
        assert_eq!(climb.cost, 3);

        assert!(matches!(
            check(&game, 2, &[(2, 2), (2, 1)]),
            Err(EngineError::Impassable { .. })
        ));
    }

    #[test]
    fn test_budget() {
        let game = board(&[((0, 2), 1, UnitType::Tank)]);
        assert_eq!(
            check(&game, 1, &[(1, 2), (2, 2), (3, 2)]),
            Err(EngineError::MoveBudgetExceeded { cost: 3, budget: 2 })
        );
    }

    #[test]
    fn test_road_bonus_on_consecutive_roads() {
        // Tank (move 2) on road: bonus pays for the first two road steps.
        let game = board(&[((0, 0), 1, UnitType::Tank)]);
        let outcome = check(&game, 1, &[(1, 0), (2, 0), (3, 0), (4, 0)]).unwrap();

        assert_eq!(outcome.cost, 4);
        assert_eq!(outcome.bonus_used, 2);
        assert_eq!(outcome.charged(), 2);
    }

    #[test]
    fn test_road_bonus_lost_off_road() {
        let game = board(&[((0, 0), 1, UnitType::Tank)]);
        // Leaves the road on the first step; the later road steps get nothing.
        assert_eq!(
            check(&game, 1, &[(0, 1), (1, 1), (1, 0)]),
            Err(EngineError::MoveBudgetExceeded { cost: 3, budget: 2 })
        );
    }

    #[test]
    fn test_no_road_bonus_for_infantry() {
        let game = board(&[((0, 0), 1, UnitType::Infantry)]);
        let outcome = check(&game, 1, &[(1, 0), (2, 0)]).unwrap();
        assert_eq!(outcome.bonus_used, 0);
    }

    #[test]
    fn test_no_road_bonus_off_road_start() {
        let game = board(&[((0, 1), 1, UnitType::Tank)]);
        assert!(matches!(
            check(&game, 1, &[(0, 0), (1, 0), (2, 0)]),
            Err(EngineError::MoveBudgetExceeded { .. })
        ));
    }

    #[test]
    fn test_cannot_pass_through_units() {
        let game = board(&[((0, 2), 1, UnitType::Infantry), ((1, 2), 2, UnitType::Infantry)]);
        assert_eq!(
            check(&game, 1, &[(1, 2), (2, 2)]),
            Err(EngineError::TileOccupied {
                position: Position::new(1, 2),
                occupant: UnitId(2),
            })
        );
    }

    #[test]
    fn test_move_unit_updates_index() {
        let mut game = board(&[((0, 2), 1, UnitType::Infantry)]);
        let events = move_unit(&mut game, &RulesConfig::default(), p(1), UnitId(1), &path(&[(1, 2), (2, 2)]))
            .unwrap();

        assert_eq!(events.len(), 1);
        let unit = game.unit(UnitId(1)).unwrap();
        assert_eq!(unit.position, Position::new(2, 2));
        assert!(unit.has_moved);
        assert_eq!(game.spatial.get(Position::new(2, 2)), Some(UnitId(1)));
        assert!(!game.spatial.is_occupied(Position::new(0, 2)));
    }

    #[test]
    fn test_move_twice_rejected() {
        let mut game = board(&[((0, 2), 1, UnitType::Infantry)]);
        let config = RulesConfig::default();
        move_unit(&mut game, &config, p(1), UnitId(1), &path(&[(1, 2)])).unwrap();

        assert_eq!(
            move_unit(&mut game, &config, p(1), UnitId(1), &path(&[(2, 2)])),
            Err(EngineError::AlreadyMoved(UnitId(1)))
        );
    }

    #[test]
    fn test_move_other_players_unit() {
        let mut game = board(&[((0, 2), 2, UnitType::Infantry)]);
        assert!(matches!(
            move_unit(&mut game, &RulesConfig::default(), p(1), UnitId(1), &path(&[(1, 2)])),
            Err(EngineError::NotYourUnit { .. })
        ));
    }
}
