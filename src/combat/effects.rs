//! Effect application
//!
//! Consumables and skills are pure data; this is the one place that turns
//! them into stat changes.

use super::damage::damage;
use crate::entities::{Combatant, Enemy, Player};
use crate::items::ConsumableEffect;
use crate::progression::SkillEffect;

/// Outcome of a consumable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectOutcome {
    HpRestored(i32),
    EnergyRestored(i32),
}

impl EffectOutcome {
    pub fn message(&self) -> String {
        match self {
            EffectOutcome::HpRestored(n) => format!("Restored {} HP.", n),
            EffectOutcome::EnergyRestored(n) => format!("Restored {} Energy.", n),
        }
    }
}

/// Stat deltas that last until the current combat ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombatBoost {
    pub defense: i32,
    pub speed: i32,
}

impl CombatBoost {
    pub fn is_empty(&self) -> bool {
        self.defense == 0 && self.speed == 0
    }

    pub fn accumulate(&mut self, other: CombatBoost) {
        self.defense += other.defense;
        self.speed += other.speed;
    }
}

/// What a skill did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillOutcome {
    pub messages: Vec<String>,
    pub boost: CombatBoost,
}

/// Apply a consumable to the player
pub fn apply_consumable(player: &mut Player, effect: ConsumableEffect) -> EffectOutcome {
    match effect {
        ConsumableEffect::RestoreHp(amount) => EffectOutcome::HpRestored(player.stats.heal(amount)),
        ConsumableEffect::RestoreEnergy(amount) => EffectOutcome::EnergyRestored(player.restore_energy(amount)),
    }
}

/// Apply a skill effect. Single-target effects use the first living
/// enemy in `targets`; area effects hit every living one.
pub fn apply_skill<'e, I>(player: &mut Player, effect: SkillEffect, targets: I) -> SkillOutcome
where
    I: IntoIterator<Item = &'e mut Enemy>,
{
    let mut outcome = SkillOutcome::default();
    let attack = player.stats.attack;

    match effect {
        SkillEffect::TargetDamage { bonus_divisor } => {
            let raw = attack + attack / bonus_divisor.max(1);
            if let Some(enemy) = targets.into_iter().find(|e| e.is_alive()) {
                let dealt = damage(raw, enemy.stats.defense);
                enemy.take_damage(dealt);
                outcome.messages.push(format!("Your shot hits {} for {} damage!", enemy.name, dealt));
            }
        }
        SkillEffect::SelfHeal { base, per_level } => {
            let amount = base + per_level * player.stats.level as i32;
            let healed = player.stats.heal(amount);
            outcome.messages.push(format!("Your repair drone restores {} HP.", healed));
        }
        SkillEffect::StatBoost { defense, speed } => {
            player.stats.defense += defense;
            player.stats.speed += speed;
            outcome.boost = CombatBoost { defense, speed };
            outcome.messages.push(boost_message(defense, speed));
        }
        SkillEffect::AreaDamage { attack_divisor, base } => {
            let raw = attack / attack_divisor.max(1) + base;
            let mut hit = 0;
            for enemy in targets.into_iter().filter(|e| e.is_alive()) {
                let dealt = damage(raw, enemy.stats.defense);
                enemy.take_damage(dealt);
                hit += 1;
                outcome.messages.push(format!("{} takes {} damage from the explosion!", enemy.name, dealt));
            }
            if hit == 0 {
                outcome.messages.push("The blast hits nothing.".to_string());
            }
        }
    }

    outcome
}

fn boost_message(defense: i32, speed: i32) -> String {
    match (defense, speed) {
        (0, s) => format!("Your speed increases by {}!", s),
        (d, 0) => format!("Your defense increases by {}!", d),
        (d, s) => format!("Your defense increases by {} and speed by {}!", d, s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::enemies::default_enemy_templates;
    use crate::entities::ClassType;
    use crate::progression::skills;

    fn enemies() -> Vec<Enemy> {
        let templates = default_enemy_templates();
        templates.templates.iter().map(|t| Enemy::from_template(t, 1)).collect()
    }

    #[test]
    fn test_consumables() {
        let mut player = Player::new("Ada", ClassType::Engineer);
        player.stats.take_damage(10);
        player.energy = 30;

        assert_eq!(apply_consumable(&mut player, ConsumableEffect::RestoreHp(25)), EffectOutcome::HpRestored(10));
        assert_eq!(
            apply_consumable(&mut player, ConsumableEffect::RestoreEnergy(40)),
            EffectOutcome::EnergyRestored(20)
        );
        assert_eq!(player.energy, 50);
    }

    #[test]
    fn test_grenade_hits_every_enemy() {
        let mut player = Player::new("Rex", ClassType::Soldier);
        player.stats.attack = 30;
        let mut floor_enemies = enemies();

        let outcome = apply_skill(&mut player, skills::skill_grenade_toss().effect, floor_enemies.iter_mut());
        assert_eq!(outcome.messages.len(), 4);
        // 30 / 3 + 10 = 20 raw, minus each defense (3, 5, 7, 9)
        let hp: Vec<i32> = floor_enemies.iter().map(|e| e.stats.hp).collect();
        assert_eq!(hp, vec![30 - 17, 40 - 15, 50 - 13, 60 - 11]);
    }

    #[test]
    fn test_grenade_skips_dead() {
        let mut player = Player::new("Rex", ClassType::Soldier);
        let mut floor_enemies = enemies();
        floor_enemies[0].stats.hp = 0;

        let outcome = apply_skill(&mut player, skills::skill_grenade_toss().effect, floor_enemies.iter_mut());
        assert_eq!(outcome.messages.len(), 3);
        assert_eq!(floor_enemies[0].stats.hp, 0);
    }

    #[test]
    fn test_power_shot() {
        let mut player = Player::new("Rex", ClassType::Soldier);
        let mut target = enemies().remove(3);

        apply_skill(&mut player, skills::skill_power_shot().effect, Some(&mut target));
        // 15 + 7 - 9
        assert_eq!(target.stats.hp, 60 - 13);
    }

    #[test]
    fn test_repair_drone_scales_with_level() {
        let mut player = Player::new("Ada", ClassType::Engineer);
        player.stats.level = 3;
        player.stats.take_damage(100);

        apply_skill(&mut player, skills::skill_repair_drone().effect, std::iter::empty());
        assert_eq!(player.stats.hp, 20 + 36);
    }

    #[test]
    fn test_boost_is_reported() {
        let mut player = Player::new("Kit", ClassType::Scout);
        let outcome = apply_skill(&mut player, skills::skill_stealth_field().effect, std::iter::empty());
        assert_eq!(outcome.boost, CombatBoost { defense: 5, speed: 3 });
        assert_eq!(player.stats.defense, 10);
        assert_eq!(player.stats.speed, 18);
    }
}
