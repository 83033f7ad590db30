//! Read-only projections for observers.
//!
//! Snapshots are plain serde structs, detached from the live game, so a
//! presentation or indexing layer can ship them as JSON without touching
//! engine state. Terrain lists are paginated; a 255x255 board has 65k
//! tiles.

use serde::{Deserialize, Serialize};

use crate::core::entity::{AccountId, GameId, MapId};
use crate::core::player::PlayerId;
use crate::core::position::Position;
use crate::map::{BuildingSpec, MapTemplate, Terrain, UnitSpec};
use crate::state::{Building, Game, GameStatus, PlayerSlot};
use crate::units::Unit;

/// Largest page a caller can ask for.
pub const MAX_PAGE: usize = 1024;

/// Which slice of a list to return.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 256,
        }
    }
}

impl PageRequest {
    #[must_use]
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    /// Limit clamped to `1..=MAX_PAGE`.
    #[must_use]
    pub fn effective_limit(&self) -> usize {
        self.limit.clamp(1, MAX_PAGE)
    }
}

/// One page of a longer list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub offset: usize,
    /// Length of the whole list.
    pub total: usize,
    /// Offset of the following page, if there is one.
    pub next: Option<usize>,
}

impl<T> Page<T> {
    /// Cut `request`'s window out of `all`, a list of `total` items.
    pub fn window(all: impl Iterator<Item = T>, total: usize, request: PageRequest) -> Self {
        let limit = request.effective_limit();
        let items: Vec<T> = all.skip(request.offset).take(limit).collect();
        let end = request.offset.saturating_add(items.len());
        Self {
            items,
            offset: request.offset,
            total,
            next: (end < total).then_some(end),
        }
    }
}

/// One terrain cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileEntry {
    pub x: u8,
    pub y: u8,
    pub terrain: Terrain,
}

impl From<(Position, Terrain)> for TileEntry {
    fn from((position, terrain): (Position, Terrain)) -> Self {
        Self {
            x: position.x,
            y: position.y,
            terrain,
        }
    }
}

/// A player slot with its id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotView {
    pub player: PlayerId,
    pub controller: Option<AccountId>,
    pub gold: u32,
    pub unit_count: u32,
    pub factory_count: u32,
    pub city_count: u32,
    pub hq_count: u32,
    pub alive: bool,
}

impl SlotView {
    fn new(player: PlayerId, slot: &PlayerSlot) -> Self {
        Self {
            player,
            controller: slot.controller,
            gold: slot.gold,
            unit_count: slot.unit_count,
            factory_count: slot.factory_count,
            city_count: slot.city_count,
            hq_count: slot.hq_count,
            alive: slot.alive,
        }
    }
}

/// Everything observers see of a game, minus terrain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub id: GameId,
    pub name: String,
    pub map_id: MapId,
    pub width: u8,
    pub height: u8,
    pub status: GameStatus,
    pub player_count: u8,
    pub joined: u8,
    pub current_player: u8,
    pub round: u32,
    /// Winning slot; 0 while undecided or for a draw.
    pub winner: u8,
    pub test_mode: bool,
    pub slots: Vec<SlotView>,
    /// All units, dead ones included, by id.
    pub units: Vec<Unit>,
    /// All buildings, by position.
    pub buildings: Vec<Building>,
}

impl GameSnapshot {
    #[must_use]
    pub fn of(game: &Game) -> Self {
        Self {
            id: game.id,
            name: game.name.clone(),
            map_id: game.map_id,
            width: game.width,
            height: game.height,
            status: game.status,
            player_count: game.player_count,
            joined: game.joined,
            current_player: game.current_player.0,
            round: game.round,
            winner: game.winner.map_or(0, |p| p.0),
            test_mode: game.test_mode,
            slots: game.slots.iter().map(|(p, s)| SlotView::new(p, s)).collect(),
            units: game.units.values().cloned().collect(),
            buildings: game.buildings.values().cloned().collect(),
        }
    }

    /// Alive units only.
    pub fn alive_units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|u| u.alive)
    }
}

/// Terrain of a running game, one page at a time.
#[must_use]
pub fn game_tiles(game: &Game, request: PageRequest) -> Page<TileEntry> {
    let total = usize::from(game.width) * usize::from(game.height);
    Page::window(game.tiles().map(TileEntry::from), total, request)
}

/// A registered template as observers see it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub id: MapId,
    pub name: String,
    pub width: u8,
    pub height: u8,
    pub player_count: u8,
    pub buildings: Vec<BuildingSpec>,
    pub units: Vec<UnitSpec>,
    /// Dense row-major terrain, paginated.
    pub terrain: Page<TileEntry>,
}

impl MapSnapshot {
    #[must_use]
    pub fn of(id: MapId, template: &MapTemplate, request: PageRequest) -> Self {
        let width = usize::from(template.width.max(1));
        let grid = template.terrain_grid();
        let total = grid.len();
        let tiles = grid.into_iter().enumerate().map(|(i, terrain)| TileEntry {
            // Bounded by the u8 dimensions.
            x: (i % width) as u8,
            y: (i / width) as u8,
            terrain,
        });
        Self {
            id,
            name: template.name.clone(),
            width: template.width,
            height: template.height,
            player_count: template.player_count() as u8,
            buildings: template.buildings.clone(),
            units: template.units.clone(),
            terrain: Page::window(tiles, total, request),
        }
    }
}
