//! Deterministic random rolls for combat.
//!
//! ## Key Features
//!
//! - **Deterministic**: same seed produces an identical sequence
//! - **Transaction-scoped**: each action of a transaction gets its own stream,
//!   derived from the transaction seed and the action's index
//! - **Injectable**: rules only ever see a `RollSource`, so tests and replays
//!   can script exact outcomes
//! - **Serializable**: O(1) state capture and restore
//!
//! ```
//! use grid_tactics::core::{GameRng, RollSource};
//!
//! let mut a = GameRng::for_action(0xfeed, 0);
//! let mut b = GameRng::for_action(0xfeed, 0);
//! assert_eq!(a.roll_percent(), b.roll_percent());
//! ```

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Odd constant used to spread per-action seeds across the seed space.
const SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// A source of percentile rolls in `1..=100`.
///
/// A strike hits when `roll <= hit_chance`.
pub trait RollSource {
    /// Draw the next roll, uniformly in `1..=100`.
    fn roll_percent(&mut self) -> u8;
}

/// Deterministic RNG seeded from transaction data.
///
/// Uses ChaCha8 for speed while keeping the sequence stable across
/// platforms, so a transaction log replays bit-for-bit.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Stream for the `index`-th action of a transaction seeded with `tx_seed`.
    ///
    /// Different indices give independent sequences; the same pair always
    /// gives the same sequence.
    #[must_use]
    pub fn for_action(tx_seed: u64, index: usize) -> Self {
        let mixed = tx_seed.wrapping_add((index as u64 + 1).wrapping_mul(SEED_MIX));
        Self::new(mixed)
    }

    /// The seed this stream was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

impl RollSource for GameRng {
    fn roll_percent(&mut self) -> u8 {
        self.inner.gen_range(1..=100)
    }
}

/// Serializable RNG state for checkpointing.
///
/// Uses ChaCha8 word position for O(1) serialization regardless of
/// how many rolls have been drawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

/// A fixed script of rolls, for tests and recorded replays.
///
/// Once the script is exhausted every further roll returns `fallback`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedRolls {
    rolls: VecDeque<u8>,
    fallback: u8,
}

impl ScriptedRolls {
    /// Script the given rolls, then fall back to 1 (a hit at any chance).
    #[must_use]
    pub fn new(rolls: impl IntoIterator<Item = u8>) -> Self {
        Self {
            rolls: rolls.into_iter().map(|r| r.clamp(1, 100)).collect(),
            fallback: 1,
        }
    }

    /// Every roll returns `value`.
    #[must_use]
    pub fn always(value: u8) -> Self {
        Self {
            rolls: VecDeque::new(),
            fallback: value.clamp(1, 100),
        }
    }

    /// Every roll hits, whatever the chance.
    #[must_use]
    pub fn always_hit() -> Self {
        Self::always(1)
    }

    /// Every roll misses, whatever the chance.
    #[must_use]
    pub fn always_miss() -> Self {
        Self::always(100)
    }

    /// Rolls left before the fallback kicks in.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl RollSource for ScriptedRolls {
    fn roll_percent(&mut self) -> u8 {
        self.rolls.pop_front().unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.roll_percent(), rng2.roll_percent());
        }
    }

    #[test]
    fn test_rolls_stay_in_range() {
        let mut rng = GameRng::new(7);
        for _ in 0..10_000 {
            let roll = rng.roll_percent();
            assert!((1..=100).contains(&roll));
        }
    }

    #[test]
    fn test_per_action_streams_differ() {
        let mut a = GameRng::for_action(99, 0);
        let mut b = GameRng::for_action(99, 1);

        let seq1: Vec<_> = (0..10).map(|_| a.roll_percent()).collect();
        let seq2: Vec<_> = (0..10).map(|_| b.roll_percent()).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_per_action_streams_are_deterministic() {
        assert_eq!(GameRng::for_action(5, 3).seed(), GameRng::for_action(5, 3).seed());
        assert_ne!(GameRng::for_action(5, 3).seed(), GameRng::for_action(6, 3).seed());
    }

    #[test]
    fn test_state_roundtrip_resumes_sequence() {
        let mut rng = GameRng::new(42);
        for _ in 0..50 {
            rng.roll_percent();
        }

        let state = rng.state();
        let expected: Vec<_> = (0..10).map(|_| rng.roll_percent()).collect();

        let mut restored = GameRng::from_state(&state);
        let actual: Vec<_> = (0..10).map(|_| restored.roll_percent()).collect();

        assert_eq!(expected, actual);
    }

    #[test]
    fn test_scripted_rolls() {
        let mut rolls = ScriptedRolls::new([10, 0, 250]);
        assert_eq!(rolls.remaining(), 3);
        assert_eq!(rolls.roll_percent(), 10);
        assert_eq!(rolls.roll_percent(), 1);
        assert_eq!(rolls.roll_percent(), 100);
        assert_eq!(rolls.roll_percent(), 1);

        let mut misses = ScriptedRolls::always_miss();
        assert_eq!(misses.roll_percent(), 100);
        assert_eq!(misses.roll_percent(), 100);
    }
}
