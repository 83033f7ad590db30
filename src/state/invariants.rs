//! Game invariants - consistency checks that detect bugs.
//!
//! These should never fire for a game that only changed through the
//! engine. Tests and the checkpoint loader run them after every step.

use rustc_hash::FxHashMap;

use super::game::Game;
use crate::core::player::{PlayerId, MAX_PLAYERS, MIN_PLAYERS};
use crate::map::BuildingKind;

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

fn violation(message: String) -> InvariantViolation {
    InvariantViolation { message }
}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(game: &Game, capture_threshold: u8) -> Vec<InvariantViolation> {
    let violations = check_shape(game);
    if !violations.is_empty() {
        return violations;
    }
    check_contents(game, capture_threshold)
}

/// Grid and slot dimensions agree. Everything else indexes by them.
fn check_shape(game: &Game) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let cells = usize::from(game.width) * usize::from(game.height);

    if cells == 0 {
        violations.push(violation(format!("board is {}x{}", game.width, game.height)));
    }
    if game.tile_count() != cells {
        violations.push(violation(format!(
            "terrain holds {} tiles for a {}x{} board",
            game.tile_count(),
            game.width,
            game.height
        )));
    }
    if game.spatial.width() != game.width || game.spatial.height() != game.height {
        violations.push(violation(format!(
            "spatial index is {}x{} on a {}x{} board",
            game.spatial.width(),
            game.spatial.height(),
            game.width,
            game.height
        )));
    }
    if game.spatial.cell_count() != cells {
        violations.push(violation(format!(
            "spatial index holds {} cells for a {}x{} board",
            game.spatial.cell_count(),
            game.width,
            game.height
        )));
    }

    let slots = game.slots.player_count();
    if usize::from(game.player_count) != slots {
        violations.push(violation(format!(
            "player count {} but {slots} slots",
            game.player_count
        )));
    }
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&slots) {
        violations.push(violation(format!("{slots} slots")));
    }
    if usize::from(game.joined) > slots {
        violations.push(violation(format!("{} joined {slots} slots", game.joined)));
    }

    violations
}

fn check_contents(game: &Game, capture_threshold: u8) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    // Spatial index mirrors alive units exactly
    let mut alive = 0usize;
    for unit in game.units.values() {
        if unit.alive {
            alive += 1;
            if unit.hp == 0 {
                violations.push(violation(format!("{} is alive with 0 hp", unit.id)));
            }
            if game.spatial.get(unit.position) != Some(unit.id) {
                violations.push(violation(format!(
                    "{} at {} is missing from the spatial index",
                    unit.id, unit.position
                )));
            }
        } else if unit.hp != 0 {
            violations.push(violation(format!("{} is dead with {} hp", unit.id, unit.hp)));
        }
    }
    if game.spatial.len() != alive {
        violations.push(violation(format!(
            "spatial index holds {} units but {} are alive",
            game.spatial.len(),
            alive
        )));
    }
    for (position, id) in game.spatial.iter() {
        match game.unit(id) {
            Some(unit) if unit.alive && unit.position == position => {}
            _ => violations.push(violation(format!("stale spatial entry {id} at {position}"))),
        }
    }

    // Cached counts match the board
    let mut units: FxHashMap<PlayerId, u32> = FxHashMap::default();
    for unit in game.units.values().filter(|u| u.alive) {
        *units.entry(unit.owner).or_default() += 1;
    }
    for (player, slot) in game.slots.iter() {
        let actual = units.get(&player).copied().unwrap_or(0);
        if slot.unit_count != actual {
            violations.push(violation(format!(
                "{player} caches {} units but owns {actual}",
                slot.unit_count
            )));
        }
        for kind in [BuildingKind::City, BuildingKind::Factory, BuildingKind::HQ] {
            let owned = game
                .buildings_of(player)
                .filter(|b| b.kind == kind)
                .count() as u32;
            if slot.building_count(kind) != owned {
                violations.push(violation(format!(
                    "{player} caches {} {kind}s but owns {owned}",
                    slot.building_count(kind)
                )));
            }
        }
    }

    // Capture machine
    for building in game.buildings.values() {
        if building.capture_player.is_none() && building.capture_progress != 0 {
            violations.push(violation(format!(
                "building at {} has progress {} without a capturer",
                building.position, building.capture_progress
            )));
        }
        if building.capture_progress >= capture_threshold && building.capture_player.is_some() {
            violations.push(violation(format!(
                "building at {} reached progress {} without changing hands",
                building.position, building.capture_progress
            )));
        }
        if building.queue.is_some() && building.kind != BuildingKind::Factory {
            violations.push(violation(format!(
                "{} at {} has a production queue",
                building.kind, building.position
            )));
        }
    }

    // Turn ownership
    if game.is_playing() && !game.is_alive(game.current_player) {
        violations.push(violation(format!(
            "current player {} is not alive",
            game.current_player
        )));
    }

    violations
}
