//! Game creation and lobby.
//!
//! A game is created from a registered template with its creator in one
//! slot. Others join the remaining slots; the last join starts the game
//! with player 1's first turn (income and production included).

use tracing::info;

use super::{require_status, turn};
use crate::core::config::RulesConfig;
use crate::core::entity::{AccountId, GameId, MapId};
use crate::core::error::{EngineError, Result};
use crate::core::event::GameEvent;
use crate::core::player::PlayerId;
use crate::map::MapTemplate;
use crate::state::{Game, GameStatus};

/// Instantiate `template` as game `id`, seating `creator` in `slot`.
#[allow(clippy::too_many_arguments)]
pub fn create_game(
    id: GameId,
    name: &str,
    map_id: MapId,
    template: &MapTemplate,
    config: &RulesConfig,
    creator: AccountId,
    slot: PlayerId,
    test_mode: bool,
) -> Result<Game> {
    let player_count = template.player_count();
    if !slot.is_valid(player_count) {
        return Err(EngineError::InvalidSlot {
            slot,
            // Template HQ counts are bounded by MAX_PLAYERS.
            player_count: player_count as u8,
        });
    }

    let mut game = Game::from_template(id, map_id, template, config, test_mode).with_name(name);
    claim(&mut game, creator, slot);

    info!(game = %id, %name, map = %map_id, players = player_count, %creator, %slot, test_mode, "game created");
    Ok(game)
}

/// Seat `caller` in `slot`. Starts the game once every slot is taken.
pub fn join_game(
    game: &mut Game,
    config: &RulesConfig,
    caller: AccountId,
    slot: PlayerId,
) -> Result<Vec<GameEvent>> {
    require_status(game, GameStatus::Lobby)?;

    let seat = game.slot(slot).ok_or(EngineError::InvalidSlot {
        slot,
        player_count: game.player_count,
    })?;
    if seat.controller.is_some() {
        return Err(EngineError::SlotTaken(slot));
    }
    if !game.test_mode {
        if let Some(held) = game.slots_of(caller).next() {
            return Err(EngineError::AlreadyJoined { caller, slot: held });
        }
    }

    claim(game, caller, slot);
    info!(game = %game.id, %caller, %slot, joined = game.joined, "player joined");

    if game.joined < game.player_count {
        return Ok(Vec::new());
    }
    Ok(start(game, config))
}

fn claim(game: &mut Game, caller: AccountId, slot: PlayerId) {
    if let Some(seat) = game.slot_mut(slot) {
        seat.controller = Some(caller);
        game.joined += 1;
    }
}

/// Lobby → Playing, round 1, player 1 to move.
fn start(game: &mut Game, config: &RulesConfig) -> Vec<GameEvent> {
    game.status = GameStatus::Playing;
    game.round = 1;
    game.current_player = PlayerId::FIRST;
    info!(game = %game.id, players = game.player_count, "game started");

    let mut events = vec![GameEvent::GameStarted {
        player_count: game.player_count,
    }];
    events.extend(turn::begin_turn(game, config));
    events.extend(turn::settle(game, config));
    events
}
