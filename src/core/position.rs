//! Grid coordinates and paths.
//!
//! Positions are `(x, y)` pairs of `u8`, so the largest board is 256×256.
//! Distances are Manhattan distances; adjacency is 4-directional.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A cell on the board.
///
/// Ordered by `x` then `y`, which fixes the iteration order of every
/// position-keyed map in the game state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: u8,
    pub y: u8,
}

/// A proposed movement path: the cells stepped onto, in order, excluding
/// the unit's starting cell.
///
/// Inline capacity covers the longest legal path of every unit type.
pub type Path = SmallVec<[Position; 8]>;

impl Position {
    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Manhattan distance between two cells.
    #[must_use]
    pub fn distance(self, other: Position) -> u16 {
        u16::from(self.x.abs_diff(other.x)) + u16::from(self.y.abs_diff(other.y))
    }

    /// Whether `other` is one orthogonal step away.
    #[must_use]
    pub fn is_adjacent(self, other: Position) -> bool {
        self.distance(other) == 1
    }

    /// Whether this cell lies on a `width` × `height` board.
    #[must_use]
    pub const fn in_bounds(self, width: u8, height: u8) -> bool {
        self.x < width && self.y < height
    }

    /// Row-major index into a dense `width`-wide grid.
    #[must_use]
    pub fn grid_index(self, width: u8) -> usize {
        usize::from(self.y) * usize::from(width) + usize::from(self.x)
    }
}

impl From<(u8, u8)> for Position {
    fn from((x, y): (u8, u8)) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Build a path from `(x, y)` pairs.
///
/// ```
/// use grid_tactics::core::{path, Position};
///
/// let p = path(&[(1, 0), (2, 0)]);
/// assert_eq!(p[1], Position::new(2, 0));
/// ```
#[must_use]
pub fn path(steps: &[(u8, u8)]) -> Path {
    steps.iter().copied().map(Position::from).collect()
}
