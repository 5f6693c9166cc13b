//! Save/load system
//!
//! Handles writing the run to disk and rebuilding it on continue.

pub mod save_game;

pub use save_game::{
    load_game, load_save_summary, save_directory, save_exists, save_game, save_path,
    RestoredGame, SaveData, SaveError, SaveSummary,
};
