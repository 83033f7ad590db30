//! Unit types and unit instances.
//!
//! - `definition`: the closed set of unit types and their capabilities
//! - `instance`: a unit on the board during a game

pub mod definition;
pub mod instance;

pub use definition::UnitType;
pub use instance::Unit;
