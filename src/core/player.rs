//! Player slot identification and per-slot data storage.
//!
//! ## PlayerId
//!
//! Type-safe slot identifier. Slots are 1-based: the first player is
//! `PlayerId(1)`, matching how maps and clients number players. At most
//! `MAX_PLAYERS` slots exist in a game.
//!
//! ## PlayerMap
//!
//! Per-slot data storage backed by `Vec` for O(1) access.
//! Supports iteration and indexing by `PlayerId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Smallest number of players a game supports.
pub const MIN_PLAYERS: usize = 2;

/// Largest number of players a game supports.
pub const MAX_PLAYERS: usize = 4;

/// Player slot identifier, 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Slot 1, the player who moves first.
    pub const FIRST: PlayerId = PlayerId(1);

    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the 0-based storage index of this slot.
    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 as usize).saturating_sub(1)
    }

    /// Check if this slot exists in a game with `player_count` players.
    #[must_use]
    pub const fn is_valid(self, player_count: usize) -> bool {
        self.0 >= 1 && (self.0 as usize) <= player_count
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    ///
    /// ```
    /// use grid_tactics::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(4).collect();
    /// assert_eq!(players.len(), 4);
    /// assert_eq!(players[0], PlayerId::new(1));
    /// assert_eq!(players[3], PlayerId::new(4));
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (1..=player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-slot data storage with O(1) access.
///
/// Backed by a `Vec<T>` with one entry per slot.
///
/// ## Example
///
/// ```
/// use grid_tactics::core::{PlayerId, PlayerMap};
///
/// let mut gold: PlayerMap<u32> = PlayerMap::new(2, |_| 5);
/// assert_eq!(gold[PlayerId::new(1)], 5);
///
/// gold[PlayerId::new(2)] = 7;
/// assert_eq!(gold[PlayerId::new(2)], 7);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    ///
    /// The factory receives the `PlayerId` for each slot.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= MAX_PLAYERS, "At most {MAX_PLAYERS} players supported");

        let data = PlayerId::all(player_count).map(factory).collect();

        Self { data }
    }

    /// Create a new PlayerMap with all entries set to the same value.
    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    /// Create a new PlayerMap with default values.
    pub fn with_default(player_count: usize) -> Self
    where
        T: Default,
    {
        Self::new(player_count, |_| T::default())
    }

    /// Get the number of slots.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Get a reference to a slot's data, or `None` for an unknown slot.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&T> {
        if player.0 == 0 {
            return None;
        }
        self.data.get(player.index())
    }

    /// Get a mutable reference to a slot's data, or `None` for an unknown slot.
    pub fn get_mut(&mut self, player: PlayerId) -> Option<&mut T> {
        if player.0 == 0 {
            return None;
        }
        self.data.get_mut(player.index())
    }

    /// Iterate over (PlayerId, &T) pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8 + 1), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8 + 1), v))
    }

    /// Iterate over all player IDs.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.data.len())
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.data[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.data[player.index()]
    }
}
