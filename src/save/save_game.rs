//! Game save/load system
//!
//! Handles saving and loading game state to/from disk. Only the player and
//! the floor index are stored; the floor itself is regenerated on load.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::entities::{ClassType, Player, Stats};
use crate::items::{Catalog, EquipSlot, Item};
use crate::world::Position;

/// Save file version for compatibility checking
pub const SAVE_VERSION: u32 = 1;

/// File name inside the save directory
pub const SAVE_FILE_NAME: &str = "savegame.json";

/// Complete save data structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub current_level_num: u32,
    pub player: PlayerSaveData,
}

/// Player-specific save data. Items and skills are stored by name and
/// looked up in the catalog again on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSaveData {
    pub name: String,
    pub class_type: ClassType,
    pub hp: i32,
    pub max_hp: i32,
    /// Includes the bonuses of equipped gear
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next_level: u32,
    pub energy: i32,
    pub max_energy: i32,
    #[serde(default)]
    pub credits: u32,
    #[serde(default)]
    pub crystals_collected: u32,
    pub x: i32,
    pub y: i32,
    pub inventory: Vec<String>,
    pub equipped_weapon: Option<String>,
    pub equipped_armor: Option<String>,
    pub learned_skills: Vec<String>,
}

/// A player rebuilt from a save, with anything the catalog did not know
#[derive(Debug, Clone)]
pub struct RestoredGame {
    pub player: Player,
    pub floor_index: u32,
    pub warnings: Vec<String>,
}

impl SaveData {
    /// Snapshot the player and floor index
    pub fn capture(player: &Player, floor_index: u32) -> Self {
        let stats = &player.stats;
        Self {
            version: SAVE_VERSION,
            current_level_num: floor_index,
            player: PlayerSaveData {
                name: player.name.clone(),
                class_type: player.class_type,
                hp: stats.hp,
                max_hp: stats.max_hp,
                attack: stats.attack,
                defense: stats.defense,
                speed: stats.speed,
                level: stats.level,
                xp: player.xp,
                xp_to_next_level: player.xp_to_next_level,
                energy: player.energy,
                max_energy: player.max_energy,
                credits: player.credits,
                crystals_collected: player.crystals_collected,
                x: player.position.x,
                y: player.position.y,
                inventory: player.inventory.items().iter().map(|i| i.name.clone()).collect(),
                equipped_weapon: player.equipment.weapon().map(|i| i.name.clone()),
                equipped_armor: player.equipment.armor().map(|i| i.name.clone()),
                learned_skills: player.learned_skills.iter().map(|s| s.name.clone()).collect(),
            },
        }
    }

    /// Rebuild the player. Unknown item or skill names are skipped and
    /// reported as warnings.
    pub fn restore(&self, catalog: &Catalog) -> RestoredGame {
        let data = &self.player;
        let mut warnings = Vec::new();
        let mut player = Player::new(data.name.clone(), data.class_type);

        player.stats = Stats {
            hp: data.hp.min(data.max_hp).max(0),
            max_hp: data.max_hp,
            attack: data.attack,
            defense: data.defense,
            speed: data.speed,
            level: data.level.max(1),
        };
        player.xp = data.xp;
        player.xp_to_next_level = data.xp_to_next_level;
        player.max_energy = data.max_energy;
        player.energy = data.energy.min(data.max_energy).max(0);
        player.credits = data.credits;
        player.crystals_collected = data.crystals_collected;
        player.position = Position::new(data.x, data.y);

        for name in &data.inventory {
            match catalog.item(name) {
                Some(item) => player.inventory.add(item),
                None => warnings.push(format!("Unknown item '{}' in save data.", name)),
            }
        }

        // Saved stats already carry the gear bonuses, so slots are filled
        // without going through Player::equip
        for (slot, name) in [
            (EquipSlot::Weapon, &data.equipped_weapon),
            (EquipSlot::Armor, &data.equipped_armor),
        ] {
            let Some(name) = name else { continue };
            match catalog.item(name).filter(|item| item.equip_slot() == Some(slot)) {
                Some(item) => {
                    player.equipment.replace(slot, item);
                }
                None => warnings.push(format!("Unknown equipped {} '{}' in save data.", slot.name(), name)),
            }
        }

        for name in &data.learned_skills {
            match catalog.skill(name) {
                Some(skill) => {
                    player.learn_skill(skill);
                }
                None => warnings.push(format!("Unknown skill '{}' in save data.", name)),
            }
        }

        for warning in &warnings {
            log::warn!("{}", warning);
        }

        RestoredGame {
            player,
            floor_index: self.current_level_num,
            warnings,
        }
    }

    /// Reject numbers no running game can produce
    fn validate(&self) -> Result<(), SaveError> {
        let data = &self.player;
        if data.max_hp <= 0 {
            return Err(SaveError::Corrupt(format!("max_hp is {}", data.max_hp)));
        }
        if data.max_energy < 0 {
            return Err(SaveError::Corrupt(format!("max_energy is {}", data.max_energy)));
        }
        if data.xp_to_next_level == 0 {
            return Err(SaveError::Corrupt("xp_to_next_level is 0".to_string()));
        }
        Ok(())
    }
}

/// Get the save directory path
pub fn save_directory() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "xylos", "Xylos") {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        // Fallback to current directory
        PathBuf::from("./saves")
    }
}

/// Default location of the save file
pub fn save_path() -> PathBuf {
    save_directory().join(SAVE_FILE_NAME)
}

/// Check if a save exists at `path`
pub fn save_exists(path: &Path) -> bool {
    path.is_file()
}

/// Brief summary of a save for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSummary {
    pub name: String,
    pub class_type: ClassType,
    pub floor: u32,
    pub level: u32,
    pub crystals: u32,
}

impl std::fmt::Display for SaveSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} the {}, level {}, floor {}, {} crystals",
            self.name,
            self.class_type.name(),
            self.level,
            self.floor,
            self.crystals
        )
    }
}

/// Load just the summary from a save file
pub fn load_save_summary(path: &Path) -> Result<SaveSummary, SaveError> {
    let save = load_game(path)?;
    Ok(SaveSummary {
        name: save.player.name,
        class_type: save.player.class_type,
        floor: save.current_level_num,
        level: save.player.level,
        crystals: save.player.crystals_collected,
    })
}

/// Save error types
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
    #[error("Corrupt save: {0}")]
    Corrupt(String),
}

/// Write the save as pretty JSON, creating the directory if needed
pub fn save_game(data: &SaveData, path: &Path) -> Result<(), SaveError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json)?;

    log::info!("Game saved to {}", path.display());
    Ok(())
}

/// Read and validate a save file
pub fn load_game(path: &Path) -> Result<SaveData, SaveError> {
    let text = fs::read_to_string(path)?;
    let save: SaveData = serde_json::from_str(&text)?;

    // Version check
    if save.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save.version,
        });
    }
    save.validate()?;

    log::info!("Game loaded from {}", path.display());
    Ok(save)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::templates;
    use tempfile::tempdir;

    fn veteran(catalog: &Catalog) -> Player {
        let mut player = Player::new("Vex", ClassType::Engineer).with_starting_gear(catalog);
        player.add_xp(60, catalog);
        player.inventory.add(templates::health_potion());
        player.inventory.add(templates::energy_crystal());
        player.credits = 42;
        player.crystals_collected = 3;
        player.energy = 17;
        player.stats.take_damage(30);
        player.position = Position::new(12, 7);
        player
    }

    #[test]
    fn test_save_load_save_is_stable() {
        let catalog = Catalog::default();
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(SAVE_FILE_NAME);

        let original = SaveData::capture(&veteran(&catalog), 4);
        save_game(&original, &path).unwrap();
        assert!(save_exists(&path));

        let loaded = load_game(&path).unwrap();
        assert_eq!(loaded, original);

        let restored = loaded.restore(&catalog);
        assert!(restored.warnings.is_empty());
        assert_eq!(restored.floor_index, 4);
        assert_eq!(SaveData::capture(&restored.player, restored.floor_index), original);
    }

    #[test]
    fn test_restore_keeps_gear_bonuses_once() {
        let catalog = Catalog::default();
        let player = veteran(&catalog);
        let restored = SaveData::capture(&player, 1).restore(&catalog).player;

        assert_eq!(restored.stats, player.stats);
        assert_eq!(restored.equipment, player.equipment);
        assert!(restored.has_skill("Repair Drone"));
    }

    #[test]
    fn test_unknown_names_become_warnings() {
        let catalog = Catalog::default();
        let mut save = SaveData::capture(&veteran(&catalog), 2);
        save.player.inventory.push("Antimatter Sword".into());
        save.player.equipped_armor = Some("Health Potion".into());
        save.player.learned_skills.push("Teleport".into());

        let restored = save.restore(&catalog);
        assert_eq!(restored.warnings.len(), 3);
        assert_eq!(restored.player.inventory.len(), 2);
        assert!(restored.player.equipment.armor().is_none());
        assert_eq!(restored.player.learned_skills.len(), 1);
    }

    #[test]
    fn test_version_and_corruption_errors() {
        let catalog = Catalog::default();
        let dir = tempdir().unwrap();
        let path = dir.path().join(SAVE_FILE_NAME);

        let mut save = SaveData::capture(&veteran(&catalog), 0);
        save.version = 99;
        save_game(&save, &path).unwrap();
        assert!(matches!(
            load_game(&path),
            Err(SaveError::VersionMismatch { expected: 1, found: 99 })
        ));

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_game(&path), Err(SaveError::Parse(_))));

        let missing = dir.path().join("missing.json");
        assert!(!save_exists(&missing));
        assert!(matches!(load_game(&missing), Err(SaveError::Io(_))));
    }

    #[test]
    fn test_impossible_numbers_are_corrupt() {
        let catalog = Catalog::default();
        let dir = tempdir().unwrap();
        let path = dir.path().join(SAVE_FILE_NAME);

        let breakers: [fn(&mut PlayerSaveData); 4] = [
            |p| p.max_hp = -1,
            |p| p.max_hp = 0,
            |p| p.max_energy = -5,
            |p| p.xp_to_next_level = 0,
        ];
        for breaker in breakers {
            let mut save = SaveData::capture(&veteran(&catalog), 2);
            breaker(&mut save.player);
            save_game(&save, &path).unwrap();
            assert!(matches!(load_game(&path), Err(SaveError::Corrupt(_))));
        }
    }

    #[test]
    fn test_restore_never_panics_on_bad_bounds() {
        let catalog = Catalog::default();
        let mut save = SaveData::capture(&veteran(&catalog), 0);
        save.player.max_hp = -1;
        save.player.max_energy = -3;

        let player = save.restore(&catalog).player;
        assert_eq!(player.stats.hp, 0);
        assert_eq!(player.energy, 0);
    }

    #[test]
    fn test_summary() {
        let catalog = Catalog::default();
        let dir = tempdir().unwrap();
        let path = dir.path().join(SAVE_FILE_NAME);
        save_game(&SaveData::capture(&veteran(&catalog), 6), &path).unwrap();

        let summary = load_save_summary(&path).unwrap();
        assert_eq!(summary.floor, 6);
        assert_eq!(summary.level, 2);
        assert_eq!(summary.to_string(), "Vex the Engineer, level 2, floor 6, 3 crystals");
    }
}
