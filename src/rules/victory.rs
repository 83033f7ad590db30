//! Win conditions.
//!
//! A game ends when:
//! - An HQ is captured (handled in `capture`)
//! - Only one player is left standing, or nobody is (a draw)
//! - The round limit passes; the best `hp + gold` wins, ties draw
//!
//! Elimination is checked after every kill, capture, turn start and
//! resignation.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::turn;
use crate::core::config::RulesConfig;
use crate::core::entity::AccountId;
use crate::core::error::{EngineError, Result};
use crate::core::event::{GameEvent, Victory};
use crate::core::player::PlayerId;
use crate::state::Game;

/// Result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Draw (no winner).
    Draw,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        matches!(self, GameResult::Winner(p) if *p == player)
    }
}

/// The result of `game`, or `None` while it is undecided.
#[must_use]
pub fn outcome(game: &Game) -> Option<GameResult> {
    if !game.is_finished() {
        return None;
    }
    Some(game.winner.map_or(GameResult::Draw, GameResult::Winner))
}

/// Eliminate every alive player with no units, factories or gold, then
/// settle the game if at most one player remains.
pub fn check_elimination(game: &mut Game) -> Vec<GameEvent> {
    if !game.is_playing() {
        return Vec::new();
    }

    let spent: Vec<PlayerId> = game
        .slots
        .iter()
        .filter(|(_, s)| s.alive && s.is_spent())
        .map(|(p, _)| p)
        .collect();

    let mut events = Vec::new();
    for player in spent {
        if let Some(slot) = game.slot_mut(player) {
            slot.alive = false;
        }
        info!(game = %game.id, %player, "player eliminated");
        events.push(GameEvent::PlayerEliminated { player });
    }

    events.extend(settle_last_standing(game));
    events
}

/// Finish the game if one or zero players remain alive.
pub fn settle_last_standing(game: &mut Game) -> Vec<GameEvent> {
    if !game.is_playing() {
        return Vec::new();
    }

    let alive: Vec<PlayerId> = game.alive_players().collect();
    let winner = match alive.as_slice() {
        [] => None,
        [last] => Some(*last),
        _ => return Vec::new(),
    };

    game.finish(winner);
    info!(game = %game.id, winner = ?winner, "game over: last standing");
    vec![GameEvent::GameOver {
        winner,
        reason: Victory::LastStanding,
    }]
}

/// Decide the game on score after the round limit. A shared best score is
/// a draw.
pub fn resolve_timeout(game: &mut Game) -> Vec<GameEvent> {
    let scores: Vec<(PlayerId, u64)> = game
        .alive_players()
        .map(|p| (p, game.score(p)))
        .collect();

    let best = scores.iter().map(|&(_, s)| s).max();
    let mut leaders = scores.iter().filter(|&&(_, s)| Some(s) == best);
    let winner = match (leaders.next(), leaders.next()) {
        (Some(&(player, _)), None) => Some(player),
        _ => None,
    };

    game.finish(winner);
    info!(game = %game.id, round = game.round, winner = ?winner, ?scores, "game over: round limit");
    vec![GameEvent::GameOver {
        winner,
        reason: Victory::Timeout,
    }]
}

/// The slot `caller` resigns: the current one if they control it,
/// otherwise their first alive slot.
pub fn resigning_slot(game: &Game, caller: AccountId) -> Result<PlayerId> {
    let current = game.current_player;
    if game.controls(caller, current) && game.is_alive(current) {
        return Ok(current);
    }
    game.slots_of(caller)
        .find(|&p| game.is_alive(p))
        .ok_or(EngineError::NotInGame {
            caller,
            game: game.id,
        })
}

/// Take `player` out of the game.
///
/// If it was their turn, the turn passes without the readiness check.
pub fn resign(game: &mut Game, config: &RulesConfig, player: PlayerId) -> Vec<GameEvent> {
    if let Some(slot) = game.slot_mut(player) {
        slot.alive = false;
    }
    info!(game = %game.id, %player, "player resigned");

    let mut events = vec![GameEvent::PlayerResigned { player }];
    events.extend(check_elimination(game));
    if game.is_playing() && game.current_player == player {
        events.extend(turn::pass_turn(game, config));
    }
    events
}
