//! Multi-player turn order, elimination, resignation and the lobby.
//!
//! These tests check that nothing assumes two players: turn order, round
//! counting and victory all work the same for 2, 3 and 4 slots.

mod common;

use common::{account, assert_consistent, board, current_account, p, start};
use grid_tactics::{
    BuildingKind, Engine, EngineError, GameEvent, GameStatus, MapError, MapTemplate, PageRequest,
    RulesConfig, ScriptedRolls, UnitId, UnitType, Victory,
};

#[test]
fn test_four_player_rounds() {
    let (mut engine, game) = start(RulesConfig::default(), board(4, 8, 8));

    let mut seen = Vec::new();
    for _ in 0..8 {
        let events = engine.end_turn(current_account(&engine, game), game).unwrap();
        let state = engine.game(game).unwrap();
        seen.push((state.current_player.0, state.round));

        let wrapped = events.contains(&GameEvent::RoundStarted { round: state.round });
        assert_eq!(wrapped, state.current_player == p(1));
        assert!(events.contains(&GameEvent::TurnStarted {
            player: state.current_player,
            round: state.round,
        }));
    }

    assert_eq!(
        seen,
        vec![(2, 1), (3, 1), (4, 1), (1, 2), (2, 2), (3, 2), (4, 2), (1, 3)]
    );
}

#[test]
fn test_eliminated_player_is_skipped() {
    let map = board(3, 8, 8)
        .with_unit((4, 4), p(1), UnitType::Tank)
        .with_unit((5, 4), p(2), UnitType::Infantry)
        .with_unit((7, 7), p(3), UnitType::Infantry);
    let (mut engine, game) = start(RulesConfig::default().with_starting_gold(0), map);

    let events = engine
        .attack(account(1), game, UnitId(1), UnitId(2), &mut ScriptedRolls::always_hit())
        .unwrap();
    assert!(events.contains(&GameEvent::PlayerEliminated { player: p(2) }));

    let events = engine.end_turn(account(1), game).unwrap();

    let state = engine.game(game).unwrap();
    assert!(!state.is_alive(p(2)));
    assert!(state.is_playing());
    assert_eq!(state.current_player, p(3));
    assert_eq!(state.round, 1);
    assert!(!events.contains(&GameEvent::TurnStarted { player: p(2), round: 1 }));
    assert_eq!(state.slot(p(3)).unwrap().gold, 1);
    assert_consistent(&engine, game);
}

#[test]
fn test_resign_on_own_turn_passes_turn() {
    let (mut engine, game) = start(RulesConfig::default(), board(3, 8, 8));

    let events = engine.resign(account(1), game).unwrap();

    assert_eq!(events[0], GameEvent::PlayerResigned { player: p(1) });
    assert_eq!(events[1], GameEvent::TurnStarted { player: p(2), round: 1 });
    let state = engine.game(game).unwrap();
    assert_eq!(state.current_player, p(2));
    assert!(!state.is_alive(p(1)));
}

#[test]
fn test_resign_out_of_turn_until_one_remains() {
    let (mut engine, game) = start(RulesConfig::default(), board(3, 8, 8));

    engine.resign(account(3), game).unwrap();
    let state = engine.game(game).unwrap();
    assert!(state.is_playing());
    assert_eq!(state.current_player, p(1));

    let events = engine.resign(account(2), game).unwrap();

    assert_eq!(
        events,
        vec![
            GameEvent::PlayerResigned { player: p(2) },
            GameEvent::GameOver { winner: Some(p(1)), reason: Victory::LastStanding },
        ]
    );
    let state = engine.game(game).unwrap();
    assert_eq!(state.status, GameStatus::Finished);
    assert_eq!(state.winner, Some(p(1)));
}

#[test]
fn test_resigned_account_cannot_resign_twice() {
    let (mut engine, game) = start(RulesConfig::default(), board(3, 8, 8));
    engine.resign(account(3), game).unwrap();

    assert!(matches!(
        engine.resign(account(3), game),
        Err(EngineError::NotInGame { .. })
    ));
}

#[test]
fn test_lobby_rejects_actions_until_full() {
    let mut engine = Engine::default();
    let map = engine.register_map(board(3, 8, 8)).unwrap();
    let game = engine.create_game(account(1), "three way", map, p(2), false).unwrap();

    assert!(matches!(
        engine.end_turn(account(1), game),
        Err(EngineError::WrongStatus { expected: GameStatus::Playing, actual: GameStatus::Lobby, .. })
    ));
    assert_eq!(
        engine.join_game(account(1), game, p(1)),
        Err(EngineError::AlreadyJoined { caller: account(1), slot: p(2) })
    );
    assert_eq!(
        engine.join_game(account(2), game, p(2)),
        Err(EngineError::SlotTaken(p(2)))
    );

    assert!(engine.join_game(account(2), game, p(1)).unwrap().is_empty());
    let events = engine.join_game(account(3), game, p(3)).unwrap();

    assert_eq!(events[0], GameEvent::GameStarted { player_count: 3 });
    let snapshot = engine.snapshot(game).unwrap();
    assert_eq!(snapshot.name, "three way");
    assert_eq!(snapshot.status, GameStatus::Playing);
    assert_eq!(snapshot.joined, 3);
    assert_eq!(snapshot.current_player, 1);
}

#[test]
fn test_test_mode_one_account_plays_every_seat() {
    let mut engine = Engine::default();
    let map = engine.register_map(board(2, 6, 6)).unwrap();
    let game = engine.create_game(account(1), "solo practice", map, p(1), true).unwrap();
    engine.join_game(account(1), game, p(2)).unwrap();

    engine.end_turn(account(1), game).unwrap();
    engine.end_turn(account(1), game).unwrap();

    let state = engine.game(game).unwrap();
    assert_eq!(state.current_player, p(1));
    assert_eq!(state.round, 2);
}

#[test]
fn test_invalid_templates_rejected() {
    let mut engine = Engine::default();

    let lonely = MapTemplate::new("lonely", 4, 4)
        .with_building((0, 0), BuildingKind::HQ, Some(p(1)));
    assert_eq!(
        engine.register_map(lonely),
        Err(EngineError::InvalidMap(MapError::HqCount(1)))
    );

    let outside = board(2, 4, 4).with_unit((9, 9), p(1), UnitType::Infantry);
    assert!(matches!(
        engine.register_map(outside),
        Err(EngineError::InvalidMap(MapError::OutOfBounds(_)))
    ));
    assert!(engine.maps().is_empty());
}

#[test]
fn test_map_snapshot_pages_terrain() {
    let mut engine = Engine::default();
    let map = engine.register_map(board(2, 5, 4)).unwrap();

    let first = engine.map_snapshot(map, PageRequest::new(0, 8)).unwrap();
    assert_eq!(first.player_count, 2);
    assert_eq!(first.terrain.total, 20);
    assert_eq!(first.terrain.items.len(), 8);
    assert_eq!(first.terrain.next, Some(8));

    let last = engine.map_snapshot(map, PageRequest::new(16, 8)).unwrap();
    assert_eq!(last.terrain.items.len(), 4);
    assert_eq!(last.terrain.next, None);
}
