//! Income and production.
//!
//! Both run at the start of a player's turn; neither can be invoked
//! directly. `build_unit` is the player-facing half: it pays for a unit
//! up front and leaves it in the factory queue until the next turn start.

use tracing::debug;

use crate::core::config::RulesConfig;
use crate::core::error::{EngineError, Result};
use crate::core::event::GameEvent;
use crate::core::player::PlayerId;
use crate::core::position::Position;
use crate::map::BuildingKind;
use crate::state::Game;
use crate::units::UnitType;

/// Income `player` earns per turn with its current buildings.
#[must_use]
pub fn income(game: &Game, config: &RulesConfig, player: PlayerId) -> u32 {
    let Some(slot) = game.slot(player) else {
        return 0;
    };
    let hq = if slot.hq_count > 0 { config.hq_income } else { 0 };
    hq + slot.city_count * config.city_income
}

/// Credit `player`'s income.
pub fn collect_income(game: &mut Game, config: &RulesConfig, player: PlayerId) -> Vec<GameEvent> {
    let amount = income(game, config, player);
    if amount == 0 {
        return Vec::new();
    }
    let Some(slot) = game.slot_mut(player) else {
        return Vec::new();
    };
    slot.gold += amount;
    let gold = slot.gold;
    debug!(%player, amount, gold, "income credited");
    vec![GameEvent::IncomeCredited {
        player,
        amount,
        gold,
    }]
}

/// Spawn queued units at `player`'s factories, in position order.
///
/// Spawned units are exhausted for the turn. An occupied factory keeps its
/// queue for the next turn.
pub fn run_production(game: &mut Game, config: &RulesConfig, player: PlayerId) -> Vec<GameEvent> {
    let queued: Vec<(Position, UnitType)> = game
        .buildings_of(player)
        .filter_map(|b| b.queue.map(|unit_type| (b.position, unit_type)))
        .collect();

    let mut events = Vec::with_capacity(queued.len());
    for (factory, unit_type) in queued {
        if game.spatial.is_occupied(factory) {
            debug!(%factory, %player, "production blocked");
            events.push(GameEvent::ProductionBlocked { factory, player });
            continue;
        }

        let hp = config.stats(unit_type).hp;
        let unit = game.spawn_unit(player, unit_type, factory, hp);
        if let Some(spawned) = game.unit_mut(unit) {
            spawned.exhaust();
        }
        if let Some(building) = game.building_mut(factory) {
            building.queue = None;
        }

        debug!(%unit, %factory, %unit_type, "unit produced");
        events.push(GameEvent::UnitProduced {
            unit,
            factory,
            player,
            unit_type,
        });
    }
    events
}

/// Queue `unit_type` at the factory at `factory`, paying immediately.
pub fn build_unit(
    game: &mut Game,
    config: &RulesConfig,
    player: PlayerId,
    factory: Position,
    unit_type: UnitType,
) -> Result<Vec<GameEvent>> {
    let building = game
        .building(factory)
        .ok_or(EngineError::NoBuilding(factory))?;
    if building.kind != BuildingKind::Factory {
        return Err(EngineError::NotAFactory(factory));
    }
    if !building.is_owned_by(player) {
        return Err(EngineError::NotYourBuilding {
            position: factory,
            player,
        });
    }
    if building.queue.is_some() {
        return Err(EngineError::QueueOccupied(factory));
    }

    let cost = config.stats(unit_type).cost;
    let available = game.slot(player).map_or(0, |s| s.gold);
    if available < cost {
        return Err(EngineError::InsufficientGold {
            needed: cost,
            available,
        });
    }

    if let Some(slot) = game.slot_mut(player) {
        slot.gold -= cost;
    }
    if let Some(building) = game.building_mut(factory) {
        building.queue = Some(unit_type);
    }

    debug!(%factory, %player, %unit_type, cost, "unit queued");
    Ok(vec![GameEvent::UnitQueued {
        factory,
        player,
        unit_type,
        cost,
    }])
}
