//! Combat resolution.
//!
//! An attack is one strike from the attacker, then, if the defender
//! survives and the attacker stands inside the defender's own band, one
//! counterstrike. Each strike draws its own roll.
//!
//! ## Hit chance
//!
//! `accuracy - evasion(defender tile) - moved penalty - far band penalty`,
//! clamped to `min_hit_chance..=max_hit_chance`. A roll of `1..=100`
//! hits when it is at most the chance.
//!
//! ## Damage
//!
//! - Hit: `max(attack - defense(defender tile), 1)`
//! - Miss: a graze of 1 if the hit would have dealt 2 or more, else 0
//! - Counterstrikes ignore terrain defense and never take the moved penalty

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::victory;
use crate::core::config::{RulesConfig, UnitStats};
use crate::core::entity::UnitId;
use crate::core::error::{EngineError, Result};
use crate::core::event::{GameEvent, Strike};
use crate::core::player::PlayerId;
use crate::core::rng::RollSource;
use crate::state::Game;

/// Result of one attack action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatOutcome {
    pub strike: Strike,
    pub counter: Option<Strike>,
    /// Units killed, in the order they fell.
    pub deaths: Vec<UnitId>,
}

/// Clamped hit chance for a strike by a unit with `stats`.
#[must_use]
pub fn hit_chance(
    config: &RulesConfig,
    stats: &UnitStats,
    evasion: u8,
    moved: bool,
    distance: u16,
) -> u8 {
    let mut chance = i32::from(stats.accuracy) - i32::from(evasion);
    if moved {
        chance -= i32::from(config.moved_penalty);
    }
    if stats.has_variable_range() && distance == u16::from(stats.max_range) {
        chance -= i32::from(config.far_range_penalty);
    }
    let clamped = chance.clamp(
        i32::from(config.min_hit_chance),
        i32::from(config.max_hit_chance),
    );
    // Clamped into a u8 range.
    clamped as u8
}

/// Damage of a landed hit. Never below 1.
#[must_use]
pub fn hit_damage(attack: u8, defense: u8) -> u8 {
    attack.saturating_sub(defense).max(1)
}

/// Damage of a missed strike whose hit would have dealt `would_be`.
#[must_use]
pub fn graze_damage(would_be: u8) -> u8 {
    u8::from(would_be >= 2)
}

/// Roll one strike and work out its damage. Does not apply it.
fn roll_strike(
    attacker: UnitId,
    defender: UnitId,
    hit_chance: u8,
    would_be: u8,
    rolls: &mut dyn RollSource,
) -> (bool, u8, u8) {
    let roll = rolls.roll_percent();
    let hit = roll <= hit_chance;
    let damage = if hit { would_be } else { graze_damage(would_be) };
    trace!(%attacker, %defender, roll, hit_chance, hit, damage, "strike roll");
    (hit, roll, damage)
}

/// Apply `damage` to `defender` and package the strike.
fn land_strike(
    game: &mut Game,
    attacker: UnitId,
    defender: UnitId,
    hit_chance: u8,
    roll: u8,
    hit: bool,
    damage: u8,
) -> (Strike, bool) {
    let mut killed = false;
    let mut defender_hp = 0;
    if let Some(unit) = game.unit_mut(defender) {
        killed = unit.take_damage(damage);
        defender_hp = unit.hp;
    }
    let strike = Strike {
        attacker,
        defender,
        hit_chance,
        roll,
        hit,
        damage,
        defender_hp,
    };
    (strike, killed)
}

/// Resolve an attack without the event wrapping.
pub fn resolve_attack(
    game: &mut Game,
    config: &RulesConfig,
    player: PlayerId,
    unit_id: UnitId,
    target_id: UnitId,
    rolls: &mut dyn RollSource,
) -> Result<CombatOutcome> {
    let attacker = super::owned_unit(game, player, unit_id)?;
    if attacker.has_acted {
        return Err(EngineError::AlreadyActed(unit_id));
    }
    if attacker.has_moved && !attacker.unit_type.can_attack_after_move() {
        return Err(EngineError::CannotAttackAfterMove {
            unit: unit_id,
            unit_type: attacker.unit_type,
        });
    }

    let target = game
        .unit(target_id)
        .cloned()
        .ok_or(EngineError::UnitNotFound(target_id))?;
    if !target.alive {
        return Err(EngineError::UnitDead(target_id));
    }
    if target.owner == player {
        return Err(EngineError::FriendlyTarget {
            unit: unit_id,
            target: target_id,
        });
    }

    let stats = *config.stats(attacker.unit_type);
    let distance = attacker.position.distance(target.position);
    if !stats.in_range(distance) {
        return Err(EngineError::OutOfRange {
            distance,
            min: stats.min_range,
            max: stats.max_range,
        });
    }

    // Validation done; from here on the attack happens.
    if let Some(unit) = game.unit_mut(unit_id) {
        unit.has_acted = true;
    }

    let target_tile = game.terrain(target.position).unwrap_or_default();
    let chance = hit_chance(config, &stats, target_tile.evasion(), attacker.has_moved, distance);
    let would_be = hit_damage(stats.attack, target_tile.defense());
    let (hit, roll, damage) = roll_strike(unit_id, target_id, chance, would_be, rolls);
    let (strike, target_killed) = land_strike(game, unit_id, target_id, chance, roll, hit, damage);

    let mut deaths = Vec::new();
    let mut counter = None;

    if target_killed {
        game.remove_dead(target_id);
        deaths.push(target_id);
    } else {
        let counter_stats = *config.stats(target.unit_type);
        if counter_stats.in_range(distance) {
            let attacker_tile = game.terrain(attacker.position).unwrap_or_default();
            let chance = hit_chance(config, &counter_stats, attacker_tile.evasion(), false, distance);
            let would_be = hit_damage(counter_stats.attack, 0);
            let (hit, roll, damage) = roll_strike(target_id, unit_id, chance, would_be, rolls);
            let (strike, attacker_killed) =
                land_strike(game, target_id, unit_id, chance, roll, hit, damage);
            if attacker_killed {
                game.remove_dead(unit_id);
                deaths.push(unit_id);
            }
            counter = Some(strike);
        }
    }

    Ok(CombatOutcome {
        strike,
        counter,
        deaths,
    })
}

/// Attack `target_id` with `unit_id` and report the events.
///
/// Any kill runs the elimination check before returning.
pub fn attack(
    game: &mut Game,
    config: &RulesConfig,
    player: PlayerId,
    unit_id: UnitId,
    target_id: UnitId,
    rolls: &mut dyn RollSource,
) -> Result<Vec<GameEvent>> {
    let outcome = resolve_attack(game, config, player, unit_id, target_id, rolls)?;

    debug!(
        attacker = %unit_id,
        target = %target_id,
        hit = outcome.strike.hit,
        damage = outcome.strike.damage,
        countered = outcome.counter.is_some(),
        "attack resolved"
    );

    let mut events = vec![GameEvent::Attacked(outcome.strike)];
    if let Some(counter) = outcome.counter {
        events.push(GameEvent::Counterattack(counter));
    }
    for &dead in &outcome.deaths {
        if let Some(unit) = game.unit(dead) {
            events.push(GameEvent::UnitDied {
                unit: dead,
                owner: unit.owner,
                position: unit.position,
            });
        }
    }
    if !outcome.deaths.is_empty() {
        events.extend(victory::check_elimination(game));
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::{GameId, MapId};
    use crate::core::position::Position;
    use crate::core::rng::ScriptedRolls;
    use crate::map::{BuildingKind, MapTemplate, Terrain};
    use crate::units::UnitType;

    fn p(n: u8) -> PlayerId {
        PlayerId::new(n)
    }

    fn config() -> RulesConfig {
        RulesConfig::default()
    }

    fn board(units: &[((u8, u8), u8, UnitType)]) -> Game {
        let mut map = MapTemplate::new("c", 6, 6)
            .with_building((0, 0), BuildingKind::HQ, Some(p(1)))
            .with_building((5, 5), BuildingKind::HQ, Some(p(2)))
            .with_tile((3, 3), Terrain::Mountain)
            .with_tile((2, 4), Terrain::Tree);
        for &(pos, owner, unit_type) in units {
            map = map.with_unit(pos, p(owner), unit_type);
        }
        Game::from_template(GameId(1), MapId(1), &map, &config(), false)
    }

    #[test]
    fn test_hit_chance_clamps() {
        let config = config();
        let ranger = *config.stats(UnitType::Ranger);
        let infantry = *config.stats(UnitType::Infantry);

        assert_eq!(hit_chance(&config, &infantry, 0, false, 1), 90);
        assert_eq!(hit_chance(&config, &infantry, 0, true, 1), 85);
        // 88 - 12 - 5 = 71, clamped up
        assert_eq!(hit_chance(&config, &ranger, 12, false, 3), 75);
        // Near band has no range penalty
        assert_eq!(hit_chance(&config, &ranger, 0, false, 2), 88);

        let sharp = UnitStats { accuracy: 100, ..infantry };
        assert_eq!(hit_chance(&config, &sharp, 0, false, 1), 95);
    }

    #[test]
    fn test_damage_rules() {
        assert_eq!(hit_damage(4, 0), 4);
        assert_eq!(hit_damage(2, 2), 1);
        assert_eq!(hit_damage(1, 2), 1);
        assert_eq!(graze_damage(4), 1);
        assert_eq!(graze_damage(2), 1);
        assert_eq!(graze_damage(1), 0);
    }

    #[test]
    fn test_tank_kills_infantry_without_counter() {
        let mut game = board(&[((1, 1), 1, UnitType::Tank), ((1, 2), 2, UnitType::Infantry)]);
        let mut rolls = ScriptedRolls::always_hit();

        let outcome =
            resolve_attack(&mut game, &config(), p(1), UnitId(1), UnitId(2), &mut rolls).unwrap();

        assert_eq!(outcome.strike.damage, 4);
        assert_eq!(outcome.counter, None);
        assert_eq!(outcome.deaths, vec![UnitId(2)]);
        assert!(!game.unit(UnitId(2)).unwrap().alive);
        assert!(!game.spatial.is_occupied(Position::new(1, 2)));
        assert!(game.unit(UnitId(1)).unwrap().has_acted);
    }

    #[test]
    fn test_counter_ignores_terrain_defense() {
        // Infantry on a tree attacks a tank; tank counters for full 4.
        let mut game = board(&[((2, 4), 1, UnitType::Infantry), ((2, 5), 2, UnitType::Tank)]);
        let mut rolls = ScriptedRolls::always_hit();

        let outcome =
            resolve_attack(&mut game, &config(), p(1), UnitId(1), UnitId(2), &mut rolls).unwrap();

        assert_eq!(outcome.strike.damage, 2);
        let counter = outcome.counter.unwrap();
        assert_eq!(counter.damage, 4);
        // 85 - tree evasion 5
        assert_eq!(counter.hit_chance, 80);
        assert_eq!(outcome.deaths, vec![UnitId(1)]);
    }

    #[test]
    fn test_ranger_not_countered_by_melee() {
        let mut game = board(&[((1, 1), 1, UnitType::Ranger), ((1, 3), 2, UnitType::Tank)]);
        let mut rolls = ScriptedRolls::always_hit();

        let outcome =
            resolve_attack(&mut game, &config(), p(1), UnitId(1), UnitId(2), &mut rolls).unwrap();

        assert_eq!(outcome.strike.damage, 3);
        assert_eq!(game.unit(UnitId(2)).unwrap().hp, 2);
        assert_eq!(outcome.counter, None);
    }

    #[test]
    fn test_ranger_cannot_fire_adjacent() {
        let mut game = board(&[((1, 1), 1, UnitType::Ranger), ((1, 2), 2, UnitType::Tank)]);
        let mut rolls = ScriptedRolls::always_hit();

        assert_eq!(
            resolve_attack(&mut game, &config(), p(1), UnitId(1), UnitId(2), &mut rolls),
            Err(EngineError::OutOfRange {
                distance: 1,
                min: 2,
                max: 3
            })
        );
    }

    #[test]
    fn test_ranger_cannot_fire_after_moving() {
        let mut game = board(&[((1, 1), 1, UnitType::Ranger), ((1, 3), 2, UnitType::Tank)]);
        game.unit_mut(UnitId(1)).unwrap().has_moved = true;
        let mut rolls = ScriptedRolls::always_hit();

        assert!(matches!(
            resolve_attack(&mut game, &config(), p(1), UnitId(1), UnitId(2), &mut rolls),
            Err(EngineError::CannotAttackAfterMove { .. })
        ));
    }

    #[test]
    fn test_miss_grazes() {
        let mut game = board(&[((1, 1), 1, UnitType::Tank), ((1, 2), 2, UnitType::Tank)]);
        let mut rolls = ScriptedRolls::new([100, 100]);

        let outcome =
            resolve_attack(&mut game, &config(), p(1), UnitId(1), UnitId(2), &mut rolls).unwrap();

        assert!(!outcome.strike.hit);
        assert_eq!(outcome.strike.damage, 1);
        assert_eq!(outcome.counter.unwrap().damage, 1);
        assert_eq!(game.unit(UnitId(1)).unwrap().hp, 4);
        assert_eq!(game.unit(UnitId(2)).unwrap().hp, 4);
    }

    #[test]
    fn test_weak_miss_whiffs() {
        // Infantry (attack 2) into mountain (defense 2): hit would deal 1.
        let mut game = board(&[((3, 2), 1, UnitType::Infantry), ((3, 3), 2, UnitType::Infantry)]);
        let mut rolls = ScriptedRolls::new([100, 1]);

        let outcome =
            resolve_attack(&mut game, &config(), p(1), UnitId(1), UnitId(2), &mut rolls).unwrap();

        assert_eq!(outcome.strike.damage, 0);
        assert_eq!(outcome.strike.hit_chance, 78);
        assert_eq!(game.unit(UnitId(2)).unwrap().hp, 3);
        assert_eq!(outcome.counter.unwrap().damage, 2);
    }

    #[test]
    fn test_friendly_fire_rejected() {
        let mut game = board(&[((1, 1), 1, UnitType::Tank), ((1, 2), 1, UnitType::Infantry)]);
        let mut rolls = ScriptedRolls::always_hit();

        assert!(matches!(
            resolve_attack(&mut game, &config(), p(1), UnitId(1), UnitId(2), &mut rolls),
            Err(EngineError::FriendlyTarget { .. })
        ));
    }

    #[test]
    fn test_rejected_attack_changes_nothing() {
        let mut game = board(&[((1, 1), 1, UnitType::Tank), ((4, 4), 2, UnitType::Infantry)]);
        let before = game.clone();
        let mut rolls = ScriptedRolls::new([50]);

        assert!(resolve_attack(&mut game, &config(), p(1), UnitId(1), UnitId(2), &mut rolls).is_err());
        assert_eq!(game, before);
        assert_eq!(rolls.remaining(), 1);
    }
}
