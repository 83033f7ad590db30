//! Position → unit lookup.
//!
//! ## Key Types
//!
//! - `SpatialIndex`: dense occupancy grid, updated write-through on every
//!   move, spawn and death so occupancy never has to be rebuilt by
//!   scanning units

pub mod index;

pub use index::SpatialIndex;
