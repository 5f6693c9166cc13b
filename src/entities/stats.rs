//! Shared combat attributes
//!
//! Both the player and enemies carry a `Stats` block; combat code only
//! talks to them through the `Combatant` trait.

use serde::{Deserialize, Serialize};

/// Core attributes. `hp` stays within `0..=max_hp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub hp: i32,
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    pub level: u32,
}

impl Stats {
    /// Level 1 stats at full health
    pub fn new(max_hp: i32, attack: i32, defense: i32, speed: i32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            attack,
            defense,
            speed,
            level: 1,
        }
    }

    /// Apply damage, returning the amount actually lost
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let actual = amount.max(0).min(self.hp);
        self.hp -= actual;
        actual
    }

    /// Heal up to max, returning the amount actually restored
    pub fn heal(&mut self, amount: i32) -> i32 {
        let actual = amount.max(0).min(self.max_hp - self.hp);
        self.hp += actual;
        actual
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Average of attack, defense and speed; used to gauge threat
    pub fn power(&self) -> f64 {
        (self.attack + self.defense + self.speed) as f64 / 3.0
    }
}

/// Anything that can take part in a fight
pub trait Combatant {
    fn name(&self) -> &str;
    fn stats(&self) -> &Stats;
    fn stats_mut(&mut self) -> &mut Stats;

    fn is_alive(&self) -> bool {
        self.stats().is_alive()
    }

    fn take_damage(&mut self, amount: i32) -> i32 {
        self.stats_mut().take_damage(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut stats = Stats::new(20, 5, 5, 5);
        assert_eq!(stats.take_damage(8), 8);
        assert_eq!(stats.take_damage(50), 12);
        assert_eq!(stats.hp, 0);
        assert!(!stats.is_alive());
    }

    #[test]
    fn test_negative_damage_is_ignored() {
        let mut stats = Stats::new(20, 5, 5, 5);
        assert_eq!(stats.take_damage(-4), 0);
        assert_eq!(stats.hp, 20);
    }

    #[test]
    fn test_heal_clamps_at_max() {
        let mut stats = Stats::new(100, 5, 5, 5);
        stats.take_damage(30);
        assert_eq!(stats.heal(50), 30);
        assert_eq!(stats.hp, 100);
    }

    #[test]
    fn test_power() {
        let stats = Stats::new(10, 9, 6, 3);
        assert_eq!(stats.power(), 6.0);
    }
}
