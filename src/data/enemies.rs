//! Enemy templates for data-driven enemy creation
//!
//! These templates are loaded from RON files and scaled to the player's
//! level when a floor is populated.

use serde::{Deserialize, Serialize};

/// A base archetype for creating enemies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    /// Display name
    pub name: String,
    /// Display glyph
    pub glyph: char,
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    /// XP reward for killing
    pub xp_value: u32,
    /// Credits dropped on death
    pub credit_value: u32,
}

impl EnemyTemplate {
    fn new(name: &str, glyph: char, stats: [i32; 4], xp_value: u32, credit_value: u32) -> Self {
        let [hp, attack, defense, speed] = stats;
        Self {
            name: name.to_string(),
            glyph,
            hp,
            attack,
            defense,
            speed,
            xp_value,
            credit_value,
        }
    }
}

/// Collection of enemy templates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnemyTemplates {
    pub templates: Vec<EnemyTemplate>,
}

impl EnemyTemplates {
    /// Find a template by name
    pub fn find(&self, name: &str) -> Option<&EnemyTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// The four station-dwelling archetypes
pub fn default_enemy_templates() -> EnemyTemplates {
    EnemyTemplates {
        templates: vec![
            EnemyTemplate::new("Cyber-Drone", 'D', [30, 8, 3, 7], 20, 5),
            EnemyTemplate::new("Mutant Scavenger", 'S', [40, 12, 5, 6], 30, 8),
            EnemyTemplate::new("Rogue Android", 'A', [50, 15, 7, 8], 40, 10),
            EnemyTemplate::new("Alien Hunter", 'H', [60, 18, 9, 9], 50, 15),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_templates() {
        let templates = default_enemy_templates();
        assert_eq!(templates.templates.len(), 4);

        let android = templates.find("Rogue Android").unwrap();
        assert_eq!(android.glyph, 'A');
        assert_eq!(android.hp, 50);
        assert_eq!(android.defense, 7);
        assert_eq!(android.credit_value, 10);
    }
}
