//! RON data loader
//!
//! Loads game data from external RON files, with fallback to hardcoded defaults.

use std::fs;
use std::path::{Path, PathBuf};

use ron::ser::PrettyConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::config::GameConfig;
use super::enemies::{default_enemy_templates, EnemyTemplates};
use crate::error::DataError;
use crate::items::{templates, Catalog, Item};
use crate::progression::{default_skills, Skill};

/// Where the data files live, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = "assets/data";

const ITEMS_FILE: &str = "items.ron";
const SKILLS_FILE: &str = "skills.ron";
const ENEMIES_FILE: &str = "enemies.ron";
const CONFIG_FILE: &str = "config.ron";

/// Manages all external game data
#[derive(Debug, Clone)]
pub struct DataManager {
    /// Item and skill definitions
    pub catalog: Catalog,
    /// Enemy archetypes
    pub enemies: EnemyTemplates,
    /// Tunable numbers
    pub config: GameConfig,
}

impl DataManager {
    /// Load from the default data directory, falling back per file
    pub fn new() -> Self {
        Self::load_from_dir(DEFAULT_DATA_DIR)
    }

    /// Load every data file under `dir`. A file that is missing keeps the
    /// built-in data silently; one that is unreadable or malformed keeps it
    /// with a warning.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let items = Self::load_items(dir);
        let skills = Self::load_skills(dir);
        let enemies = Self::load_enemies(dir);
        let config = Self::load_config(dir);

        log::info!(
            "Loaded {} items, {} skills, {} enemy archetypes",
            items.len(),
            skills.len(),
            enemies.templates.len()
        );

        Self {
            catalog: Catalog::new(items, skills),
            enemies,
            config,
        }
    }

    /// Load item definitions from RON file
    fn load_items(dir: &Path) -> Vec<Item> {
        match read_ron::<Vec<Item>>(&dir.join(ITEMS_FILE)) {
            Ok(Some(items)) if !items.is_empty() => items,
            Ok(Some(_)) => {
                log::warn!("{} is empty, using built-in items", ITEMS_FILE);
                templates::all()
            }
            Ok(None) => templates::all(),
            Err(e) => {
                log::warn!("{}; using built-in items", e);
                templates::all()
            }
        }
    }

    /// Load skill definitions from RON file
    fn load_skills(dir: &Path) -> Vec<Skill> {
        match read_ron::<Vec<Skill>>(&dir.join(SKILLS_FILE)) {
            Ok(Some(skills)) => skills,
            Ok(None) => default_skills(),
            Err(e) => {
                log::warn!("{}; using built-in skills", e);
                default_skills()
            }
        }
    }

    /// Load enemy templates from RON file
    fn load_enemies(dir: &Path) -> EnemyTemplates {
        match read_ron::<EnemyTemplates>(&dir.join(ENEMIES_FILE)) {
            Ok(Some(enemies)) if !enemies.is_empty() => enemies,
            Ok(Some(_)) => {
                log::warn!("{} has no templates, using built-in enemies", ENEMIES_FILE);
                default_enemy_templates()
            }
            Ok(None) => default_enemy_templates(),
            Err(e) => {
                log::warn!("{}; using built-in enemies", e);
                default_enemy_templates()
            }
        }
    }

    /// Load the game configuration from RON file
    fn load_config(dir: &Path) -> GameConfig {
        match read_ron::<GameConfig>(&dir.join(CONFIG_FILE)) {
            Ok(Some(config)) => config,
            Ok(None) => GameConfig::default(),
            Err(e) => {
                log::warn!("{}; using default configuration", e);
                GameConfig::default()
            }
        }
    }
}

impl Default for DataManager {
    fn default() -> Self {
        Self {
            catalog: Catalog::default(),
            enemies: default_enemy_templates(),
            config: GameConfig::default(),
        }
    }
}

/// Parse a RON file, or `None` if it does not exist
fn read_ron<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, DataError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    ron::from_str(&content).map(Some).map_err(|source| DataError::Parse {
        file: path.display().to_string(),
        source,
    })
}

fn write_ron<T: Serialize>(path: PathBuf, value: &T) -> Result<(), DataError> {
    let file = path.display().to_string();
    let text = ron::ser::to_string_pretty(value, PrettyConfig::default())
        .map_err(|source| DataError::Serialize { file: file.clone(), source })?;
    fs::write(&path, text).map_err(|source| DataError::Io { path: file, source })
}

/// Export all default data to RON files for easy editing
pub fn export_default_data(dir: impl AsRef<Path>) -> Result<(), DataError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|source| DataError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    write_ron(dir.join(ITEMS_FILE), &templates::all())?;
    write_ron(dir.join(SKILLS_FILE), &default_skills())?;
    write_ron(dir.join(ENEMIES_FILE), &default_enemy_templates())?;
    write_ron(dir.join(CONFIG_FILE), &GameConfig::default())?;

    log::info!("Exported default data to {}", dir.display());
    Ok(())
}
