//! Game rules.
//!
//! Each submodule owns one part of the rulebook and works directly on a
//! `&mut Game`:
//!
//! - `movement`: path validation and moves
//! - `combat`: hit chance, damage, counterattacks
//! - `capture`: building capture and stale-progress cleanup
//! - `economy`: income, production, queuing units
//! - `turn`: readiness, waiting, handover, turn start
//! - `victory`: elimination, HQ capture, timeout, resignation
//! - `lifecycle`: game creation and joining
//!
//! Every rule validates completely before it writes, so a rejected action
//! leaves the game as it found it. `apply_action` is the single entry point
//! for in-game actions.

pub mod capture;
pub mod combat;
pub mod economy;
pub mod lifecycle;
pub mod movement;
pub mod turn;
pub mod victory;

pub use combat::CombatOutcome;
pub use movement::MoveOutcome;
pub use victory::GameResult;

use tracing::debug;

use crate::core::action::Action;
use crate::core::config::RulesConfig;
use crate::core::entity::{AccountId, UnitId};
use crate::core::error::{EngineError, Result};
use crate::core::event::GameEvent;
use crate::core::player::PlayerId;
use crate::core::rng::RollSource;
use crate::state::{Game, GameStatus};
use crate::units::Unit;

/// Apply one in-game action on behalf of `caller`.
///
/// Checks the game is Playing and, for everything except `Resign`, that
/// `caller` controls the current player. After the action, if the game is
/// still running and the current player has dropped out (killed by a
/// counterattack, resigned), the turn passes on.
pub fn apply_action(
    game: &mut Game,
    config: &RulesConfig,
    caller: AccountId,
    action: &Action,
    rolls: &mut dyn RollSource,
) -> Result<Vec<GameEvent>> {
    require_status(game, GameStatus::Playing)?;
    let round = game.round;

    let player = match action {
        Action::Resign => victory::resigning_slot(game, caller)?,
        _ => turn::authorize(game, caller)?,
    };

    let mut events = match action {
        Action::Move { unit, path } => movement::move_unit(game, config, player, *unit, path)?,
        Action::Attack { unit, target } => combat::attack(game, config, player, *unit, *target, rolls)?,
        Action::Capture { unit } => capture::capture(game, config, player, *unit)?,
        Action::Wait { unit } => turn::wait_unit(game, player, *unit)?,
        Action::Build { factory, unit_type } => {
            economy::build_unit(game, config, player, *factory, *unit_type)?
        }
        Action::EndTurn => turn::end_turn(game, config, player)?,
        Action::Resign => victory::resign(game, config, player),
    };

    events.extend(turn::settle(game, config));

    debug!(game = %game.id, %player, action = action.name(), events = events.len(), "action applied");
    game.record(player, action.clone(), round);

    Ok(events)
}

/// Reject unless the game is in `expected`.
pub(crate) fn require_status(game: &Game, expected: GameStatus) -> Result<()> {
    if game.status == expected {
        Ok(())
    } else {
        Err(EngineError::WrongStatus {
            game: game.id,
            expected,
            actual: game.status,
        })
    }
}

/// Look up an alive unit owned by `player`.
pub(crate) fn owned_unit(game: &Game, player: PlayerId, id: UnitId) -> Result<Unit> {
    let unit = game.unit(id).ok_or(EngineError::UnitNotFound(id))?;
    if !unit.alive {
        return Err(EngineError::UnitDead(id));
    }
    if unit.owner != player {
        return Err(EngineError::NotYourUnit {
            unit: id,
            owner: unit.owner,
            player,
        });
    }
    Ok(unit.clone())
}
