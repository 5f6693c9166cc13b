//! Experience and leveling
//!
//! XP calculations, leveling formulas, and progression helpers.

use crate::entities::Player;
use crate::items::Catalog;
use super::skills::skill_unlock;

/// XP needed to go from level 1 to 2
pub const XP_TO_LEVEL_UP_BASE: u32 = 50;
/// Growth factor of the XP requirement per level
pub const XP_LEVEL_MULTIPLIER: f64 = 1.5;

pub const LEVEL_UP_HP: i32 = 15;
pub const LEVEL_UP_ATTACK: i32 = 3;
pub const LEVEL_UP_DEFENSE: i32 = 2;
pub const LEVEL_UP_SPEED: i32 = 1;
pub const LEVEL_UP_ENERGY: i32 = 10;

/// One level gained during `add_xp`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelUp {
    pub level: u32,
    /// Skill learned on reaching this level
    pub unlocked: Option<String>,
}

/// XP needed to advance past `level`
pub fn xp_for_level(level: u32) -> u32 {
    let exponent = level.saturating_sub(1) as i32;
    (XP_TO_LEVEL_UP_BASE as f64 * XP_LEVEL_MULTIPLIER.powi(exponent)) as u32
}

/// Award XP and apply every level-up it pays for
pub fn add_xp(player: &mut Player, amount: u32, catalog: &Catalog) -> Vec<LevelUp> {
    player.xp = player.xp.saturating_add(amount);
    let mut gained = Vec::new();

    while player.xp_to_next_level > 0 && player.xp >= player.xp_to_next_level {
        player.xp -= player.xp_to_next_level;
        let level = level_up(player);
        player.xp_to_next_level = xp_for_level(level);

        let unlocked = skill_unlock(player.class_type, level).and_then(|name| match catalog.skill(name) {
            Some(skill) => player.learn_skill(skill).then(|| name.to_string()),
            None => {
                log::warn!("Unlock {} is not in the skill catalog", name);
                None
            }
        });
        log::info!("{} reached level {}", player.name, level);
        gained.push(LevelUp { level, unlocked });
    }

    gained
}

/// Raise stats by one level, fully restoring HP and energy
fn level_up(player: &mut Player) -> u32 {
    let stats = &mut player.stats;
    stats.level += 1;
    stats.max_hp += LEVEL_UP_HP;
    stats.hp = stats.max_hp;
    stats.attack += LEVEL_UP_ATTACK;
    stats.defense += LEVEL_UP_DEFENSE;
    stats.speed += LEVEL_UP_SPEED;
    player.max_energy += LEVEL_UP_ENERGY;
    player.energy = player.max_energy;
    player.stats.level
}
