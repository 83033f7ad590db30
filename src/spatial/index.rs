//! Occupancy grid for one board.
//!
//! The `SpatialIndex` answers "who stands on (x, y)?" in O(1). It holds at
//! most one unit per cell and knows nothing about unit state; the rules
//! keep it in step with `Unit::position` and `Unit::alive`.

use serde::{Deserialize, Serialize};

use crate::core::entity::UnitId;
use crate::core::position::Position;

/// Dense row-major occupancy grid.
///
/// Backed by a persistent vector, so cloning a game for a transaction
/// shares the grid until it is written.
///
/// ## Usage
///
/// ```
/// use grid_tactics::core::{Position, UnitId};
/// use grid_tactics::spatial::SpatialIndex;
///
/// let mut index = SpatialIndex::new(4, 4);
/// let a = Position::new(1, 1);
/// let b = Position::new(1, 2);
///
/// index.place(a, UnitId(7));
/// assert_eq!(index.get(a), Some(UnitId(7)));
///
/// index.relocate(a, b);
/// assert!(!index.is_occupied(a));
/// assert_eq!(index.get(b), Some(UnitId(7)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpatialIndex {
    width: u8,
    height: u8,
    cells: im::Vector<Option<UnitId>>,
    occupied: usize,
}

impl SpatialIndex {
    /// Create an empty index for a `width` × `height` board.
    #[must_use]
    pub fn new(width: u8, height: u8) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            cells: std::iter::repeat(None).take(size).collect(),
            occupied: 0,
        }
    }

    #[must_use]
    pub fn width(&self) -> u8 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u8 {
        self.height
    }

    /// Number of stored cells. `width * height` unless decoded from bad data.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn index_of(&self, position: Position) -> Option<usize> {
        position
            .in_bounds(self.width, self.height)
            .then(|| position.grid_index(self.width))
            .filter(|&i| i < self.cells.len())
    }

    /// The unit standing at `position`. Off-board cells are empty.
    #[must_use]
    pub fn get(&self, position: Position) -> Option<UnitId> {
        self.index_of(position)
            .and_then(|i| self.cells.get(i).copied().flatten())
    }

    /// Check if a unit stands at `position`.
    #[must_use]
    pub fn is_occupied(&self, position: Position) -> bool {
        self.get(position).is_some()
    }

    /// Put `unit` at `position`.
    ///
    /// Returns the unit previously there, if any. Off-board positions are
    /// ignored and return `None`.
    pub fn place(&mut self, position: Position, unit: UnitId) -> Option<UnitId> {
        let i = self.index_of(position)?;
        let previous = self.cells.set(i, Some(unit));
        if previous.is_none() {
            self.occupied += 1;
        }
        previous
    }

    /// Clear `position`, returning whoever stood there.
    pub fn remove(&mut self, position: Position) -> Option<UnitId> {
        let i = self.index_of(position)?;
        let previous = self.cells.set(i, None);
        if previous.is_some() {
            self.occupied -= 1;
        }
        previous
    }

    /// Move the occupant of `from` to `to`.
    ///
    /// Returns the moved unit, or `None` (and changes nothing) if `from`
    /// is empty or `to` is off the board. The caller has already checked
    /// that `to` is free.
    pub fn relocate(&mut self, from: Position, to: Position) -> Option<UnitId> {
        let target = self.index_of(to)?;
        let unit = self.get(from)?;
        if from == to {
            return Some(unit);
        }
        self.remove(from);
        let displaced = self.cells.set(target, Some(unit));
        if displaced.is_none() {
            self.occupied += 1;
        }
        Some(unit)
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.occupied
    }

    /// Check if no cell is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Iterate over occupied cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, UnitId)> + '_ {
        let width = usize::from(self.width.max(1));
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            // Grid dimensions are u8, so both coordinates fit.
            cell.map(|unit| (Position::new((i % width) as u8, (i / width) as u8), unit))
        })
    }
}
