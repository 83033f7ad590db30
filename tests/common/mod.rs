//! Shared setup for integration tests.
//!
//! Seating convention: account `n` always sits in slot `n`.

#![allow(dead_code)]

use grid_tactics::{
    check_invariants, AccountId, BuildingKind, Engine, GameId, MapTemplate, PlayerId, RulesConfig,
};

pub fn p(n: u8) -> PlayerId {
    PlayerId::new(n)
}

pub fn account(n: u8) -> AccountId {
    AccountId(u64::from(n))
}

/// Account seated in `player`.
pub fn account_of(player: PlayerId) -> AccountId {
    account(player.0)
}

/// Empty board with one HQ per player along the top row.
pub fn board(players: u8, width: u8, height: u8) -> MapTemplate {
    let mut map = MapTemplate::new("board", width, height);
    for i in 1..=players {
        map = map.with_building((i - 1, 0), BuildingKind::HQ, Some(p(i)));
    }
    map
}

/// Register `map`, create and fill a game. Every slot is joined, so the
/// game is Playing with player 1 to move.
pub fn start(config: RulesConfig, map: MapTemplate) -> (Engine, GameId) {
    let players = map.player_count() as u8;
    let mut engine = Engine::new(config).unwrap();
    let map = engine.register_map(map).unwrap();
    let game = engine.create_game(account(1), "test game", map, p(1), false).unwrap();
    for i in 2..=players {
        engine.join_game(account(i), game, p(i)).unwrap();
    }
    (engine, game)
}

/// Account whose turn it is.
pub fn current_account(engine: &Engine, game: GameId) -> AccountId {
    account_of(engine.game(game).unwrap().current_player)
}

/// Fail the test on any invariant violation.
pub fn assert_consistent(engine: &Engine, game: GameId) {
    let state = engine.game(game).unwrap();
    let violations = check_invariants(state, engine.config().capture_threshold);
    assert!(violations.is_empty(), "{violations:?}");
}
