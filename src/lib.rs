//! Echoes of Xylos - a turn-based sci-fi dungeon crawler
//!
//! Explore procedurally generated floors of a dying world, fight its
//! machines and hunters, and bring back enough Energy Crystals to
//! reignite it.

pub mod combat;
pub mod data;
pub mod entities;
pub mod error;
pub mod game;
pub mod items;
pub mod progression;
pub mod save;
pub mod ui;
pub mod world;

// Re-export commonly used types
pub use error::{ActionError, GenerationError};
pub use game::{Game, GameState};
pub use world::{Floor, Position};
