//! The engine: templates, games and transactional dispatch.
//!
//! Every game-scoped operation follows the same path:
//!
//! 1. Load the committed game from the store
//! 2. Clone it (O(1), persistent collections)
//! 3. Apply the action(s) to the clone
//! 4. Commit the clone only if everything succeeded
//!
//! A rejected action or batch therefore leaves the stored game exactly as
//! it was.

use tracing::{debug, info, warn};

use super::store::{MemoryStore, StateStore};
use crate::core::action::{Action, Transaction};
use crate::core::config::{ConfigError, RulesConfig};
use crate::core::entity::{AccountId, GameId, MapId, UnitId};
use crate::core::error::{EngineError, Result};
use crate::core::event::GameEvent;
use crate::core::player::PlayerId;
use crate::core::position::Position;
use crate::core::rng::{GameRng, RollSource, ScriptedRolls};
use crate::map::{MapRegistry, MapTemplate};
use crate::rules::{self, lifecycle};
use crate::state::{check_invariants, Game};
use crate::units::UnitType;
use crate::view::{GameSnapshot, MapSnapshot, PageRequest, SnapshotError};

/// Authoritative rules engine over a `StateStore`.
///
/// ## Example
///
/// ```
/// use grid_tactics::core::{path, AccountId, PlayerId, RulesConfig, UnitId};
/// use grid_tactics::engine::Engine;
/// use grid_tactics::map::{BuildingKind, MapTemplate};
/// use grid_tactics::units::UnitType;
///
/// let mut engine = Engine::new(RulesConfig::default()).unwrap();
/// let map = engine
///     .register_map(
///         MapTemplate::new("duel", 6, 6)
///             .with_building((0, 0), BuildingKind::HQ, Some(PlayerId::new(1)))
///             .with_building((5, 5), BuildingKind::HQ, Some(PlayerId::new(2)))
///             .with_unit((1, 0), PlayerId::new(1), UnitType::Infantry),
///     )
///     .unwrap();
///
/// let alice = AccountId(1);
/// let bob = AccountId(2);
/// let game = engine.create_game(alice, "opening night", map, PlayerId::new(1), false).unwrap();
/// engine.join_game(bob, game, PlayerId::new(2)).unwrap();
///
/// engine.move_unit(alice, game, UnitId(1), &path(&[(2, 0), (3, 0)])).unwrap();
/// engine.wait_unit(alice, game, UnitId(1)).unwrap();
/// engine.end_turn(alice, game).unwrap();
///
/// assert_eq!(engine.game(game).unwrap().current_player, PlayerId::new(2));
/// ```
#[derive(Clone, Debug)]
pub struct Engine<S: StateStore = MemoryStore> {
    config: RulesConfig,
    maps: MapRegistry,
    store: S,
}

impl Default for Engine<MemoryStore> {
    fn default() -> Self {
        Self {
            config: RulesConfig::default(),
            maps: MapRegistry::new(),
            store: MemoryStore::new(),
        }
    }
}

impl Engine<MemoryStore> {
    /// Engine with an in-memory store.
    pub fn new(config: RulesConfig) -> std::result::Result<Self, ConfigError> {
        Self::with_store(config, MemoryStore::new())
    }
}

impl<S: StateStore> Engine<S> {
    /// Engine over an existing store. The configuration is validated.
    pub fn with_store(config: RulesConfig, store: S) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            maps: MapRegistry::new(),
            store,
        })
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    #[must_use]
    pub fn maps(&self) -> &MapRegistry {
        &self.maps
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Committed state of a game.
    #[must_use]
    pub fn game(&self, id: GameId) -> Option<&Game> {
        self.store.load(id)
    }

    /// Observer view of a game.
    #[must_use]
    pub fn snapshot(&self, id: GameId) -> Option<GameSnapshot> {
        self.store.load(id).map(GameSnapshot::of)
    }

    /// Observer view of a template, with one page of terrain.
    #[must_use]
    pub fn map_snapshot(&self, id: MapId, request: PageRequest) -> Option<MapSnapshot> {
        self.maps
            .get(id)
            .map(|template| MapSnapshot::of(id, &template, request))
    }

    // === Lifecycle ===

    /// Validate and store a map template.
    pub fn register_map(&mut self, template: MapTemplate) -> Result<MapId> {
        let name = template.name.clone();
        let id = self.maps.register(template)?;
        info!(map = %id, %name, "map registered");
        Ok(id)
    }

    /// Create a game called `name` from `map`, seating `caller` in `slot`.
    ///
    /// A rejected creation leaves the id counter where it was.
    pub fn create_game(
        &mut self,
        caller: AccountId,
        name: &str,
        map: MapId,
        slot: PlayerId,
        test_mode: bool,
    ) -> Result<GameId> {
        let template = self.maps.get(map).ok_or(EngineError::MapNotFound(map))?;
        let id = self.store.next_id();
        let game =
            lifecycle::create_game(id, name, map, &template, &self.config, caller, slot, test_mode)?;
        self.store.commit(game);
        Ok(id)
    }

    /// Seat `caller` in `slot`; the last join starts the game.
    pub fn join_game(&mut self, caller: AccountId, game: GameId, slot: PlayerId) -> Result<Vec<GameEvent>> {
        self.transact(game, |game, config| lifecycle::join_game(game, config, caller, slot))
    }

    // === In-game actions ===

    pub fn move_unit(
        &mut self,
        caller: AccountId,
        game: GameId,
        unit: UnitId,
        path: &[Position],
    ) -> Result<Vec<GameEvent>> {
        let action = Action::Move {
            unit,
            path: path.iter().copied().collect(),
        };
        self.apply(caller, game, &action, &mut ScriptedRolls::default())
    }

    /// Attack with rolls drawn from `rolls`.
    pub fn attack(
        &mut self,
        caller: AccountId,
        game: GameId,
        unit: UnitId,
        target: UnitId,
        rolls: &mut dyn RollSource,
    ) -> Result<Vec<GameEvent>> {
        self.apply(caller, game, &Action::Attack { unit, target }, rolls)
    }

    pub fn capture(&mut self, caller: AccountId, game: GameId, unit: UnitId) -> Result<Vec<GameEvent>> {
        self.apply(caller, game, &Action::Capture { unit }, &mut ScriptedRolls::default())
    }

    pub fn wait_unit(&mut self, caller: AccountId, game: GameId, unit: UnitId) -> Result<Vec<GameEvent>> {
        self.apply(caller, game, &Action::Wait { unit }, &mut ScriptedRolls::default())
    }

    pub fn build_unit(
        &mut self,
        caller: AccountId,
        game: GameId,
        factory: Position,
        unit_type: UnitType,
    ) -> Result<Vec<GameEvent>> {
        let action = Action::Build { factory, unit_type };
        self.apply(caller, game, &action, &mut ScriptedRolls::default())
    }

    pub fn end_turn(&mut self, caller: AccountId, game: GameId) -> Result<Vec<GameEvent>> {
        self.apply(caller, game, &Action::EndTurn, &mut ScriptedRolls::default())
    }

    pub fn resign(&mut self, caller: AccountId, game: GameId) -> Result<Vec<GameEvent>> {
        self.apply(caller, game, &Action::Resign, &mut ScriptedRolls::default())
    }

    /// Apply a single action atomically.
    pub fn apply(
        &mut self,
        caller: AccountId,
        game: GameId,
        action: &Action,
        rolls: &mut dyn RollSource,
    ) -> Result<Vec<GameEvent>> {
        self.transact(game, |game, config| {
            rules::apply_action(game, config, caller, action, rolls)
        })
    }

    // === Batches ===

    /// Apply a transaction all-or-nothing.
    ///
    /// Action `i` rolls from `GameRng::for_action(tx.seed, i)`, so the same
    /// transaction against the same state always has the same result.
    pub fn submit(&mut self, tx: &Transaction) -> Result<Vec<GameEvent>> {
        let (caller, seed) = (tx.caller, tx.seed);
        self.transact(tx.game, |game, config| {
            run_batch(game, config, caller, &tx.actions, |index| GameRng::for_action(seed, index))
        })
    }

    /// Apply a batch all-or-nothing with every roll drawn from `rolls`.
    pub fn submit_with(
        &mut self,
        caller: AccountId,
        game: GameId,
        actions: &[Action],
        rolls: &mut dyn RollSource,
    ) -> Result<Vec<GameEvent>> {
        self.transact(game, |game, config| {
            let mut events = Vec::new();
            for (index, action) in actions.iter().enumerate() {
                let produced = rules::apply_action(game, config, caller, action, rolls)
                    .map_err(|source| batch_error(index, source))?;
                events.extend(produced);
            }
            Ok(events)
        })
    }

    // === Checkpoints ===

    /// Encode a committed game.
    pub fn checkpoint(&self, id: GameId) -> std::result::Result<Vec<u8>, SnapshotError> {
        self.store
            .load(id)
            .ok_or(SnapshotError::GameNotFound(id))?
            .to_bytes()
    }

    /// Load a checkpoint into the store, replacing any game with its id.
    ///
    /// The decoded game must pass the invariant checker.
    pub fn restore(&mut self, bytes: &[u8]) -> std::result::Result<GameId, SnapshotError> {
        let game = Game::from_bytes(bytes)?;
        if let Some(violation) = check_invariants(&game, self.config.capture_threshold)
            .into_iter()
            .next()
        {
            warn!(game = %game.id, %violation, "refusing inconsistent checkpoint");
            return Err(SnapshotError::Inconsistent(violation));
        }
        let id = game.id;
        self.store.commit(game);
        info!(game = %id, "checkpoint restored");
        Ok(id)
    }

    /// Clone, apply, commit on success.
    fn transact<F>(&mut self, id: GameId, apply: F) -> Result<Vec<GameEvent>>
    where
        F: FnOnce(&mut Game, &RulesConfig) -> Result<Vec<GameEvent>>,
    {
        let mut scratch = self
            .store
            .load(id)
            .cloned()
            .ok_or(EngineError::GameNotFound(id))?;

        match apply(&mut scratch, &self.config) {
            Ok(events) => {
                self.store.commit(scratch);
                Ok(events)
            }
            Err(error) => {
                debug!(game = %id, %error, "rejected");
                Err(error)
            }
        }
    }
}

fn batch_error(index: usize, source: EngineError) -> EngineError {
    EngineError::Batch {
        index,
        source: Box::new(source),
    }
}

fn run_batch(
    game: &mut Game,
    config: &RulesConfig,
    caller: AccountId,
    actions: &[Action],
    mut rng_for: impl FnMut(usize) -> GameRng,
) -> Result<Vec<GameEvent>> {
    let mut events = Vec::new();
    for (index, action) in actions.iter().enumerate() {
        let mut rng = rng_for(index);
        let produced = rules::apply_action(game, config, caller, action, &mut rng)
            .map_err(|source| batch_error(index, source))?;
        events.extend(produced);
    }
    Ok(events)
}
