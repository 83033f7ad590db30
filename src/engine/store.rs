//! Game storage.
//!
//! The engine reads a game from a `StateStore`, applies an action or a
//! batch to a clone, and writes the clone back only if everything
//! succeeded. A store only has to hand out games by id and accept whole
//! replacements; it never sees a half-applied game.

use rustc_hash::FxHashMap;

use crate::core::entity::GameId;
use crate::state::Game;

/// Where games live between actions.
pub trait StateStore {
    /// Current committed state of a game.
    fn load(&self, id: GameId) -> Option<&Game>;

    /// Replace (or insert) a game with a fully applied state.
    fn commit(&mut self, game: Game);

    /// Id the next created game will take. Only `commit` advances it.
    fn next_id(&self) -> GameId;

    /// Number of stored games.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-process store backed by a hash map.
#[derive(Clone, Debug)]
pub struct MemoryStore {
    games: FxHashMap<GameId, Game>,
    next_id: GameId,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            games: FxHashMap::default(),
            next_id: GameId::FIRST,
        }
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate over stored games, in no particular order.
    pub fn games(&self) -> impl Iterator<Item = &Game> {
        self.games.values()
    }
}

impl StateStore for MemoryStore {
    fn load(&self, id: GameId) -> Option<&Game> {
        self.games.get(&id)
    }

    fn commit(&mut self, game: Game) {
        if game.id >= self.next_id {
            self.next_id = game.id.next();
        }
        self.games.insert(game.id, game);
    }

    fn next_id(&self) -> GameId {
        self.next_id
    }

    fn len(&self) -> usize {
        self.games.len()
    }
}
