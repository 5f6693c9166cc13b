//! Class skills
//!
//! Each class unlocks one skill at level 2 and another at level 5.
//! Skills are plain data; `combat::effects` interprets them.

use serde::{Deserialize, Serialize};

use crate::entities::ClassType;

/// What a skill does when activated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillEffect {
    /// Hits the engaged enemy for `attack + attack / bonus_divisor - defense`
    TargetDamage { bonus_divisor: i32 },
    /// Heals `base + per_level * level`
    SelfHeal { base: i32, per_level: i32 },
    /// Raises stats until the current combat ends
    StatBoost { defense: i32, speed: i32 },
    /// Hits every living enemy on the floor for `attack / attack_divisor + base - defense`
    AreaDamage { attack_divisor: i32, base: i32 },
}

impl SkillEffect {
    /// Whether the effect reaches every enemy on the floor
    pub fn is_area(&self) -> bool {
        matches!(self, SkillEffect::AreaDamage { .. })
    }
}

/// A learnable skill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub description: String,
    pub energy_cost: i32,
    pub effect: SkillEffect,
}

impl Skill {
    pub fn new(name: &str, description: &str, energy_cost: i32, effect: SkillEffect) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            energy_cost,
            effect,
        }
    }
}

pub fn skill_power_shot() -> Skill {
    Skill::new(
        "Power Shot",
        "A focused shot dealing 150% damage.",
        15,
        SkillEffect::TargetDamage { bonus_divisor: 2 },
    )
}

pub fn skill_grenade_toss() -> Skill {
    Skill::new(
        "Grenade Toss",
        "Deals damage to all enemies on the floor.",
        30,
        SkillEffect::AreaDamage { attack_divisor: 3, base: 10 },
    )
}

pub fn skill_repair_drone() -> Skill {
    Skill::new(
        "Repair Drone",
        "Deploys a drone that heals you.",
        20,
        SkillEffect::SelfHeal { base: 30, per_level: 2 },
    )
}

pub fn skill_shield_matrix() -> Skill {
    Skill::new(
        "Shield Matrix",
        "Temporarily boosts your defense.",
        25,
        SkillEffect::StatBoost { defense: 10, speed: 0 },
    )
}

pub fn skill_burst_of_speed() -> Skill {
    Skill::new(
        "Burst of Speed",
        "Temporarily increases your speed.",
        10,
        SkillEffect::StatBoost { defense: 0, speed: 5 },
    )
}

pub fn skill_stealth_field() -> Skill {
    Skill::new(
        "Stealth Field",
        "Become harder to hit for a short time.",
        35,
        SkillEffect::StatBoost { defense: 5, speed: 3 },
    )
}

/// All built-in skills, in catalog order
pub fn default_skills() -> Vec<Skill> {
    vec![
        skill_power_shot(),
        skill_grenade_toss(),
        skill_repair_drone(),
        skill_shield_matrix(),
        skill_burst_of_speed(),
        skill_stealth_field(),
    ]
}

/// Name of the skill a class unlocks on reaching `level`, if any
pub fn skill_unlock(class: ClassType, level: u32) -> Option<&'static str> {
    match (class, level) {
        (ClassType::Soldier, 2) => Some("Power Shot"),
        (ClassType::Soldier, 5) => Some("Grenade Toss"),
        (ClassType::Engineer, 2) => Some("Repair Drone"),
        (ClassType::Engineer, 5) => Some("Shield Matrix"),
        (ClassType::Scout, 2) => Some("Burst of Speed"),
        (ClassType::Scout, 5) => Some("Stealth Field"),
        _ => None,
    }
}
