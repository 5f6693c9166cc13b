//! Enemy creation
//!
//! Concrete enemies are built from an archetype template, scaled linearly
//! with the player's level.

use rand::seq::SliceRandom;
use rand::Rng;

use super::stats::{Combatant, Stats};
use crate::data::EnemyTemplate;
use crate::items::{Catalog, Item};
use crate::world::Position;

/// Identifier of an enemy on the current floor
pub type EnemyId = u32;

/// A hostile on the map
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    /// Assigned by the floor when added; 0 until then
    pub id: EnemyId,
    pub name: String,
    pub symbol: char,
    pub stats: Stats,
    pub xp_value: u32,
    pub credit_value: u32,
    pub item_drop: Option<Item>,
    pub position: Position,
}

/// Multiplier applied to archetype numbers for a given player level
pub fn level_multiplier(player_level: u32) -> f64 {
    1.0 + 0.2 * player_level.saturating_sub(1) as f64
}

fn scale_i32(value: i32, multiplier: f64) -> i32 {
    (value as f64 * multiplier) as i32
}

fn scale_u32(value: u32, multiplier: f64) -> u32 {
    (value as f64 * multiplier) as u32
}

impl Enemy {
    /// Build an enemy from a template, scaled to the player's level
    pub fn from_template(template: &EnemyTemplate, player_level: u32) -> Self {
        let m = level_multiplier(player_level);
        let mut stats = Stats::new(
            scale_i32(template.hp, m),
            scale_i32(template.attack, m),
            scale_i32(template.defense, m),
            scale_i32(template.speed, m),
        );
        stats.level = player_level.max(1);

        Self {
            id: 0,
            name: template.name.clone(),
            symbol: template.glyph,
            stats,
            xp_value: scale_u32(template.xp_value, m),
            credit_value: scale_u32(template.credit_value, m),
            item_drop: None,
            position: Position::new(0, 0),
        }
    }

    /// Rough threat label relative to the player's power
    pub fn strength_label(&self, player: &Stats) -> &'static str {
        let player_power = player.power();
        if player_power <= 0.0 {
            return "Very Strong";
        }
        let ratio = self.stats.power() / player_power;
        if ratio > 1.5 {
            "Very Strong"
        } else if ratio > 1.1 {
            "Strong"
        } else if ratio < 0.7 {
            "Weak"
        } else {
            "Normal"
        }
    }
}

impl Combatant for Enemy {
    fn name(&self) -> &str {
        &self.name
    }

    fn stats(&self) -> &Stats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut Stats {
        &mut self.stats
    }
}

/// Pick a random archetype, scale it, and maybe give it a drop
pub fn spawn_enemy<R: Rng + ?Sized>(
    rng: &mut R,
    templates: &[EnemyTemplate],
    player_level: u32,
    catalog: &Catalog,
    drop_chance: f64,
) -> Option<Enemy> {
    let template = templates.choose(rng)?;
    let mut enemy = Enemy::from_template(template, player_level);
    if rng.gen_bool(drop_chance.clamp(0.0, 1.0)) {
        enemy.item_drop = catalog.random_loot(rng);
    }
    Some(enemy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::enemies::default_enemy_templates;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_level_one_is_unscaled() {
        let templates = default_enemy_templates();
        let drone = Enemy::from_template(templates.find("Cyber-Drone").unwrap(), 1);
        assert_eq!(drone.stats.hp, 30);
        assert_eq!(drone.stats.attack, 8);
        assert_eq!(drone.xp_value, 20);
        assert_eq!(drone.symbol, 'D');
    }

    #[test]
    fn test_scaling_truncates() {
        let templates = default_enemy_templates();
        // 1.4x at level 3
        let hunter = Enemy::from_template(templates.find("Alien Hunter").unwrap(), 3);
        assert_eq!(hunter.stats.hp, 84);
        assert_eq!(hunter.stats.defense, 12);
        assert_eq!(hunter.credit_value, 21);
    }

    #[test]
    fn test_strength_labels() {
        let templates = default_enemy_templates();
        let drone = Enemy::from_template(templates.find("Cyber-Drone").unwrap(), 1);

        assert_eq!(drone.strength_label(&Stats::new(100, 8, 3, 7)), "Normal");
        assert_eq!(drone.strength_label(&Stats::new(100, 30, 20, 20)), "Weak");
        assert_eq!(drone.strength_label(&Stats::new(100, 3, 2, 4)), "Very Strong");
    }

    #[test]
    fn test_spawn_drop_chance() {
        let templates = default_enemy_templates();
        let catalog = Catalog::default();
        let mut rng = StdRng::seed_from_u64(11);

        let always = spawn_enemy(&mut rng, &templates.templates, 1, &catalog, 1.0).unwrap();
        assert!(always.item_drop.is_some());

        let never = spawn_enemy(&mut rng, &templates.templates, 1, &catalog, 0.0).unwrap();
        assert!(never.item_drop.is_none());

        assert!(spawn_enemy(&mut rng, &[], 1, &catalog, 0.5).is_none());
    }
}
