//! Data loading and external game content
//!
//! This module handles loading game data from external RON files,
//! allowing for data-driven content and easy tuning.

pub mod config;
pub mod enemies;
pub mod loader;

pub use config::GameConfig;
pub use enemies::{default_enemy_templates, EnemyTemplate, EnemyTemplates};
pub use loader::{export_default_data, DataManager, DEFAULT_DATA_DIR};
