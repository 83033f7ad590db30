//! Turn and round control.
//!
//! The current player cycles through alive slots in index order. Wrapping
//! from a higher slot back to a lower one starts a new round. A turn
//! begins with, in order:
//!
//! 1. Reset the new player's unit flags
//! 2. Clear stale capture progress
//! 3. Collect income
//! 4. Run factory production
//! 5. Elimination check
//!
//! The departing player's flags are left alone until their own next turn.

use tracing::{debug, info};

use super::{capture, economy, victory};
use crate::core::config::RulesConfig;
use crate::core::entity::{AccountId, UnitId};
use crate::core::error::{EngineError, Result};
use crate::core::event::GameEvent;
use crate::core::player::PlayerId;
use crate::state::Game;

/// Resolve `caller` to the current player, or reject.
pub fn authorize(game: &Game, caller: AccountId) -> Result<PlayerId> {
    let current = game.current_player;
    if game.controls(caller, current) && game.is_alive(current) {
        Ok(current)
    } else {
        Err(EngineError::NotYourTurn { caller, current })
    }
}

/// Finish `unit_id`'s turn without acting.
pub fn wait_unit(game: &mut Game, player: PlayerId, unit_id: UnitId) -> Result<Vec<GameEvent>> {
    let unit = super::owned_unit(game, player, unit_id)?;
    if unit.has_acted {
        return Err(EngineError::AlreadyActed(unit_id));
    }
    if let Some(unit) = game.unit_mut(unit_id) {
        unit.exhaust();
    }
    Ok(vec![GameEvent::UnitWaited { unit: unit_id }])
}

/// Units of `player` that have neither moved, acted nor waited.
#[must_use]
pub fn idle_units(game: &Game, player: PlayerId) -> Vec<UnitId> {
    game.units_of(player)
        .filter(|u| !u.is_done())
        .map(|u| u.id)
        .collect()
}

/// End `player`'s turn. Every alive unit must be done first.
pub fn end_turn(game: &mut Game, config: &RulesConfig, player: PlayerId) -> Result<Vec<GameEvent>> {
    let units = idle_units(game, player);
    if !units.is_empty() {
        return Err(EngineError::UnitsNotReady { units });
    }
    Ok(pass_turn(game, config))
}

/// Next alive slot after `from`, wrapping. `None` if nobody is alive.
#[must_use]
pub fn next_alive(game: &Game, from: PlayerId) -> Option<PlayerId> {
    let count = game.player_count;
    (1..=count)
        .map(|step| PlayerId::new((from.0 - 1 + step) % count + 1))
        .find(|&p| game.is_alive(p))
}

/// Hand the turn to the next alive player.
///
/// Starts a new round on wrap-around and resolves the game by score once
/// the round limit is passed. If the incoming player drops out during
/// their own turn start, the turn keeps moving.
pub fn pass_turn(game: &mut Game, config: &RulesConfig) -> Vec<GameEvent> {
    let mut events = Vec::new();

    while game.is_playing() {
        let Some(next) = next_alive(game, game.current_player) else {
            events.extend(victory::settle_last_standing(game));
            break;
        };

        if next <= game.current_player {
            game.round += 1;
            debug!(game = %game.id, round = game.round, "round started");
            events.push(GameEvent::RoundStarted { round: game.round });
        }
        game.current_player = next;

        if game.round > config.max_rounds {
            events.extend(victory::resolve_timeout(game));
            break;
        }

        events.extend(begin_turn(game, config));

        if game.is_alive(game.current_player) {
            break;
        }
    }

    events
}

/// Run the start-of-turn sequence for the current player.
pub fn begin_turn(game: &mut Game, config: &RulesConfig) -> Vec<GameEvent> {
    let player = game.current_player;
    info!(game = %game.id, %player, round = game.round, "turn started");
    let mut events = vec![GameEvent::TurnStarted {
        player,
        round: game.round,
    }];

    let ids: Vec<UnitId> = game.units_of(player).map(|u| u.id).collect();
    for id in ids {
        if let Some(unit) = game.unit_mut(id) {
            unit.reset_turn_flags();
        }
    }

    events.extend(capture::cleanup_stale(game, player));
    events.extend(economy::collect_income(game, config, player));
    events.extend(economy::run_production(game, config, player));
    events.extend(victory::check_elimination(game));

    events
}

/// After any action: if the current player is no longer alive, move on.
pub fn settle(game: &mut Game, config: &RulesConfig) -> Vec<GameEvent> {
    if game.is_playing() && !game.is_alive(game.current_player) {
        pass_turn(game, config)
    } else {
        Vec::new()
    }
}
