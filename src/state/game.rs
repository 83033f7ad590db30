//! Game state.
//!
//! ## Game
//!
//! Everything one match owns:
//! - Lifecycle status, round, current player, winner
//! - Player slots (controller, gold, cached counts)
//! - Dense terrain grid, buildings, units
//! - Spatial index (position → unit)
//! - Action history
//!
//! Collections are `im` persistent structures, so `clone()` is O(1) and
//! the engine can apply a transaction to a scratch copy and throw it away
//! on failure. Ordered maps keep iteration (production order, unit lists)
//! deterministic.

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};

use super::slot::{Building, PlayerSlot};
use crate::core::action::{Action, ActionRecord};
use crate::core::config::RulesConfig;
use crate::core::entity::{AccountId, GameId, MapId, UnitId};
use crate::core::player::{PlayerId, PlayerMap};
use crate::core::position::Position;
use crate::map::{MapTemplate, Terrain};
use crate::spatial::SpatialIndex;
use crate::units::{Unit, UnitType};

/// Lifecycle of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Waiting for every slot to be claimed.
    Lobby,
    /// Under way.
    Playing,
    /// Decided; no further actions accepted.
    Finished,
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GameStatus::Lobby => "Lobby",
            GameStatus::Playing => "Playing",
            GameStatus::Finished => "Finished",
        };
        f.write_str(name)
    }
}

/// Complete state of one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    // === Identity ===
    pub id: GameId,
    /// Display name chosen by the creator.
    pub name: String,
    pub map_id: MapId,
    pub width: u8,
    pub height: u8,

    // === Progression ===
    pub status: GameStatus,
    /// Slots derived from the template's HQ count.
    pub player_count: u8,
    /// Slots claimed so far.
    pub joined: u8,
    /// Whose turn it is. Meaningful only while Playing.
    pub current_player: PlayerId,
    /// Starts at 1 when the game starts.
    pub round: u32,
    pub next_unit_id: UnitId,
    /// `None` while undecided, and for a draw.
    pub winner: Option<PlayerId>,
    /// Lets one identity control several slots.
    pub test_mode: bool,

    // === Board ===
    pub slots: PlayerMap<PlayerSlot>,
    /// Row-major terrain, immutable after creation.
    tiles: Vector<Terrain>,
    pub buildings: OrdMap<Position, Building>,
    pub units: OrdMap<UnitId, Unit>,
    pub spatial: SpatialIndex,

    // === History ===
    pub history: Vector<ActionRecord>,
    /// Game-wide action counter.
    pub sequence: u32,
}

impl Game {
    /// Instantiate a template into a fresh game in the Lobby.
    ///
    /// Units get ids from 1 in template order, at full hp. Every slot
    /// starts with `config.starting_gold`. The template must already be
    /// validated.
    #[must_use]
    pub fn from_template(
        id: GameId,
        map_id: MapId,
        template: &MapTemplate,
        config: &RulesConfig,
        test_mode: bool,
    ) -> Self {
        let player_count = template.player_count();
        let mut game = Self {
            id,
            name: String::new(),
            map_id,
            width: template.width,
            height: template.height,
            status: GameStatus::Lobby,
            // Validated templates have at most MAX_PLAYERS HQs.
            player_count: player_count as u8,
            joined: 0,
            current_player: PlayerId::FIRST,
            round: 0,
            next_unit_id: UnitId::FIRST,
            winner: None,
            test_mode,
            slots: PlayerMap::new(player_count, |_| PlayerSlot::new(config.starting_gold)),
            tiles: template.terrain_grid().into_iter().collect(),
            buildings: OrdMap::new(),
            units: OrdMap::new(),
            spatial: SpatialIndex::new(template.width, template.height),
            history: Vector::new(),
            sequence: 0,
        };

        for spec in &template.buildings {
            if let Some(slot) = spec.owner.and_then(|p| game.slots.get_mut(p)) {
                *slot.building_count_mut(spec.kind) += 1;
            }
            game.buildings
                .insert(spec.position, Building::new(spec.position, spec.kind, spec.owner));
        }

        for spec in &template.units {
            let hp = config.stats(spec.unit_type).hp;
            game.spawn_unit(spec.owner, spec.unit_type, spec.position, hp);
        }

        game
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    // === Queries ===

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }

    /// Terrain at `position`, or `None` off the board.
    #[must_use]
    pub fn terrain(&self, position: Position) -> Option<Terrain> {
        if !position.in_bounds(self.width, self.height) {
            return None;
        }
        self.tiles.get(position.grid_index(self.width)).copied()
    }

    /// Iterate over every tile in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (Position, Terrain)> + '_ {
        let width = usize::from(self.width.max(1));
        self.tiles.iter().enumerate().map(move |(i, terrain)| {
            // Both coordinates are bounded by u8 dimensions.
            (Position::new((i % width) as u8, (i / width) as u8), *terrain)
        })
    }

    /// Length of the stored terrain grid.
    pub(crate) fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    /// The alive unit standing at `position`.
    #[must_use]
    pub fn unit_at(&self, position: Position) -> Option<&Unit> {
        self.spatial.get(position).and_then(|id| self.units.get(&id))
    }

    #[must_use]
    pub fn building(&self, position: Position) -> Option<&Building> {
        self.buildings.get(&position)
    }

    pub fn building_mut(&mut self, position: Position) -> Option<&mut Building> {
        self.buildings.get_mut(&position)
    }

    #[must_use]
    pub fn slot(&self, player: PlayerId) -> Option<&PlayerSlot> {
        self.slots.get(player)
    }

    pub fn slot_mut(&mut self, player: PlayerId) -> Option<&mut PlayerSlot> {
        self.slots.get_mut(player)
    }

    /// Whether `player` is a slot of this game and still in it.
    #[must_use]
    pub fn is_alive(&self, player: PlayerId) -> bool {
        self.slots.get(player).is_some_and(|s| s.alive)
    }

    /// Alive players in slot order.
    pub fn alive_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.slots.iter().filter(|(_, s)| s.alive).map(|(p, _)| p)
    }

    /// Alive units of `player`, by id.
    pub fn units_of(&self, player: PlayerId) -> impl Iterator<Item = &Unit> + '_ {
        self.units.values().filter(move |u| u.alive && u.owner == player)
    }

    /// Buildings owned by `player`, in position order.
    pub fn buildings_of(&self, player: PlayerId) -> impl Iterator<Item = &Building> + '_ {
        self.buildings.values().filter(move |b| b.is_owned_by(player))
    }

    /// Does `account` control `player`'s slot?
    #[must_use]
    pub fn controls(&self, account: AccountId, player: PlayerId) -> bool {
        self.slots.get(player).is_some_and(|s| s.controller == Some(account))
    }

    /// Slots controlled by `account`, in slot order.
    pub fn slots_of(&self, account: AccountId) -> impl Iterator<Item = PlayerId> + '_ {
        self.slots
            .iter()
            .filter(move |(_, s)| s.controller == Some(account))
            .map(|(p, _)| p)
    }

    /// Remaining unit hp plus gold; the timeout score.
    #[must_use]
    pub fn score(&self, player: PlayerId) -> u64 {
        let hp: u64 = self.units_of(player).map(|u| u64::from(u.hp)).sum();
        let gold = self.slots.get(player).map_or(0, |s| u64::from(s.gold));
        hp + gold
    }

    // === Mutation helpers ===

    /// Create a unit at `position` and index it. The cell must be free.
    pub fn spawn_unit(
        &mut self,
        owner: PlayerId,
        unit_type: UnitType,
        position: Position,
        hp: u8,
    ) -> UnitId {
        let id = self.next_unit_id;
        self.next_unit_id = id.next();
        self.units.insert(id, Unit::new(id, owner, unit_type, position, hp));
        self.spatial.place(position, id);
        if let Some(slot) = self.slots.get_mut(owner) {
            slot.unit_count += 1;
        }
        id
    }

    /// Bookkeeping after a unit's hp reached 0: clear its cell and
    /// decrement its owner's unit count.
    pub fn remove_dead(&mut self, id: UnitId) {
        let Some(unit) = self.units.get(&id) else {
            return;
        };
        let (position, owner) = (unit.position, unit.owner);
        if self.spatial.get(position) == Some(id) {
            self.spatial.remove(position);
        }
        if let Some(slot) = self.slots.get_mut(owner) {
            slot.unit_count = slot.unit_count.saturating_sub(1);
        }
    }

    /// End the game. `None` is a draw.
    pub fn finish(&mut self, winner: Option<PlayerId>) {
        self.status = GameStatus::Finished;
        self.winner = winner;
    }

    /// Append to the action history. `round` is the round the action was
    /// taken in, which an end of turn may already have advanced past.
    pub fn record(&mut self, player: PlayerId, action: Action, round: u32) {
        self.history
            .push_back(ActionRecord::new(player, action, round, self.sequence));
        self.sequence += 1;
    }
}
