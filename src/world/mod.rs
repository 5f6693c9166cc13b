//! World module
//!
//! Contains floor data structures, tiles, traps, and procedural generation.

pub mod map;
pub mod tile;
pub mod trap;
pub mod generation;

pub use map::{Floor, Position, CARDINALS};
pub use tile::{Cell, TileType};
pub use trap::{Trap, TrapOutcome};
pub use generation::{FloorGenerator, FloorRequest, Room};
