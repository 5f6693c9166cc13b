//! Damage calculation
//!
//! Flat subtraction of defense from attack, never below zero.

use crate::entities::Combatant;

/// Result of a combat attack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackResult {
    /// Damage actually dealt after clamping to remaining HP
    pub damage: i32,
    /// Whether the defender died from this hit
    pub defeated: bool,
    /// Descriptive message
    pub message: String,
}

/// Damage dealt by `attack` against `defense`
pub fn damage(attack: i32, defense: i32) -> i32 {
    (attack - defense).max(0)
}

/// Resolve a basic attack
pub fn attack_target<A, D>(attacker: &A, defender: &mut D) -> AttackResult
where
    A: Combatant + ?Sized,
    D: Combatant + ?Sized,
{
    let raw = damage(attacker.stats().attack, defender.stats().defense);
    let dealt = defender.take_damage(raw);
    let defeated = !defender.is_alive();

    let message = if defeated {
        format!("{} attacks {} for {} damage. {} is defeated!", attacker.name(), defender.name(), raw, defender.name())
    } else {
        format!("{} attacks {} for {} damage.", attacker.name(), defender.name(), raw)
    };

    AttackResult { damage: dealt, defeated, message }
}

/// Chance that the player escapes: own speed over combined speed
pub fn flee_chance(player_speed: i32, enemy_speed: i32) -> f64 {
    let player_speed = player_speed.max(0) as f64;
    let total = player_speed + enemy_speed.max(0) as f64;
    if total <= 0.0 {
        0.5
    } else {
        player_speed / total
    }
}
