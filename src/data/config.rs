//! Tunable game constants
//!
//! Loaded from `config.ron` when present, every field falls back to the
//! built-in value when omitted.

use serde::{Deserialize, Serialize};

/// Numbers that shape floors, spawns and the win condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub map_width: i32,
    pub map_height: i32,
    pub max_rooms: u32,
    pub room_min_size: i32,
    pub room_max_size: i32,
    pub max_enemies_per_level: u32,
    pub max_items_per_level: u32,
    pub trap_damage: i32,
    pub trap_spawn_chance: f64,
    pub crystal_spawn_chance_base: f64,
    pub crystal_spawn_chance_per_level: f64,
    /// Upper bound of crystal spawn attempts per floor
    pub max_crystal_attempts: u32,
    pub enemy_drop_chance: f64,
    pub crystals_to_win: u32,
    pub rest_hp: i32,
    pub rest_energy: i32,
    pub rest_encounter_chance: f64,
    /// A shop appears on every floor index divisible by this (except 0)
    pub shop_floor_interval: u32,
    pub max_generation_attempts: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            map_width: 40,
            map_height: 20,
            max_rooms: 10,
            room_min_size: 5,
            room_max_size: 10,
            max_enemies_per_level: 7,
            max_items_per_level: 5,
            trap_damage: 15,
            trap_spawn_chance: 0.033,
            crystal_spawn_chance_base: 0.02,
            crystal_spawn_chance_per_level: 0.005,
            max_crystal_attempts: 2,
            enemy_drop_chance: 0.3,
            crystals_to_win: 10,
            rest_hp: 15,
            rest_energy: 10,
            rest_encounter_chance: 0.2,
            shop_floor_interval: 5,
            max_generation_attempts: 50,
        }
    }
}

impl GameConfig {
    /// Whether the given floor index gets a shop
    pub fn wants_shop(&self, floor_index: u32) -> bool {
        self.shop_floor_interval > 0 && floor_index > 0 && floor_index % self.shop_floor_interval == 0
    }

    /// Per-attempt crystal spawn probability on a floor
    pub fn crystal_chance(&self, floor_index: u32) -> f64 {
        (self.crystal_spawn_chance_base + floor_index as f64 * self.crystal_spawn_chance_per_level)
            .clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shop_floors() {
        let config = GameConfig::default();
        assert!(!config.wants_shop(0));
        assert!(!config.wants_shop(4));
        assert!(config.wants_shop(5));
        assert!(config.wants_shop(10));
    }

    #[test]
    fn test_crystal_chance_grows_with_depth() {
        let config = GameConfig::default();
        assert!((config.crystal_chance(0) - 0.02).abs() < 1e-9);
        assert!((config.crystal_chance(4) - 0.04).abs() < 1e-9);
        assert_eq!(config.crystal_chance(10_000), 1.0);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config: GameConfig = ron::from_str("(crystals_to_win: 3)").unwrap();
        assert_eq!(config.crystals_to_win, 3);
        assert_eq!(config.map_width, 40);
    }
}
