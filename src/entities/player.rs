//! Player character

use serde::{Deserialize, Serialize};

use super::stats::{Combatant, Stats};
use crate::combat::effects::{apply_consumable, EffectOutcome};
use crate::error::ActionError;
use crate::items::{Catalog, EquipSlot, Equipment, Inventory, Item, ItemKind};
use crate::progression::skills::Skill;
use crate::progression::xp::{self, LevelUp, XP_TO_LEVEL_UP_BASE};
use crate::world::Position;

pub const INITIAL_PLAYER_HP: i32 = 100;
pub const INITIAL_PLAYER_ATTACK: i32 = 10;
pub const INITIAL_PLAYER_DEFENSE: i32 = 5;
pub const INITIAL_PLAYER_SPEED: i32 = 10;
pub const INITIAL_PLAYER_ENERGY: i32 = 50;

/// Gear every new character starts with equipped
pub const STARTING_GEAR: [&str; 2] = ["Laser Pistol", "Scrap Armor"];

/// Character class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassType {
    Soldier,
    Engineer,
    Scout,
}

impl ClassType {
    pub const ALL: [ClassType; 3] = [ClassType::Soldier, ClassType::Engineer, ClassType::Scout];

    pub fn name(&self) -> &'static str {
        match self {
            ClassType::Soldier => "Soldier",
            ClassType::Engineer => "Engineer",
            ClassType::Scout => "Scout",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ClassType::Soldier => "+5 Attack, +10 HP",
            ClassType::Engineer => "+5 Defense, +20 HP",
            ClassType::Scout => "+5 Speed, +2 Attack, immune to traps",
        }
    }

    /// Level 1 stats with the class modifiers applied
    pub fn base_stats(&self) -> Stats {
        let mut stats = Stats::new(
            INITIAL_PLAYER_HP,
            INITIAL_PLAYER_ATTACK,
            INITIAL_PLAYER_DEFENSE,
            INITIAL_PLAYER_SPEED,
        );
        match self {
            ClassType::Soldier => {
                stats.attack += 5;
                stats.max_hp += 10;
            }
            ClassType::Engineer => {
                stats.defense += 5;
                stats.max_hp += 20;
            }
            ClassType::Scout => {
                stats.speed += 5;
                stats.attack += 2;
            }
        }
        stats.hp = stats.max_hp;
        stats
    }
}

/// Which item an inventory action refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemChoice {
    /// Index into the inventory
    Bag(usize),
    /// Whatever sits in an equipment slot
    Equipped(EquipSlot),
}

/// Result of a successful inventory action
#[derive(Debug, Clone, PartialEq)]
pub enum ItemUse {
    Consumed { name: String, outcome: EffectOutcome },
    Equipped { name: String, replaced: Option<String> },
}

impl ItemUse {
    pub fn message(&self) -> String {
        match self {
            ItemUse::Consumed { name, outcome } => format!("You use the {}. {}", name, outcome.message()),
            ItemUse::Equipped { name, replaced: Some(old) } => {
                format!("You unequip the {} and equip the {}.", old, name)
            }
            ItemUse::Equipped { name, replaced: None } => format!("You equip the {}.", name),
        }
    }
}

/// The player character
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub name: String,
    pub class_type: ClassType,
    pub stats: Stats,
    pub position: Position,
    pub inventory: Inventory,
    pub equipment: Equipment,
    pub xp: u32,
    pub xp_to_next_level: u32,
    pub learned_skills: Vec<Skill>,
    pub energy: i32,
    pub max_energy: i32,
    pub credits: u32,
    pub crystals_collected: u32,
}

impl Player {
    /// A fresh level 1 character without any gear
    pub fn new(name: impl Into<String>, class_type: ClassType) -> Self {
        Self {
            name: name.into(),
            class_type,
            stats: class_type.base_stats(),
            position: Position::new(0, 0),
            inventory: Inventory::new(),
            equipment: Equipment::new(),
            xp: 0,
            xp_to_next_level: XP_TO_LEVEL_UP_BASE,
            learned_skills: Vec::new(),
            energy: INITIAL_PLAYER_ENERGY,
            max_energy: INITIAL_PLAYER_ENERGY,
            credits: 0,
            crystals_collected: 0,
        }
    }

    /// Equip the starting kit from the catalog
    pub fn with_starting_gear(mut self, catalog: &Catalog) -> Self {
        for name in STARTING_GEAR {
            match catalog.item(name) {
                Some(item) => {
                    if self.equip(item).is_err() {
                        log::warn!("Starting item {} is not equippable", name);
                    }
                }
                None => log::warn!("Starting item {} missing from catalog", name),
            }
        }
        self
    }

    /// Equip a weapon or armor piece, swapping out the current one.
    /// Returns the name of the replaced item, which goes back to the bag.
    /// Non-equippable items are handed back untouched.
    pub fn equip(&mut self, item: Item) -> Result<Option<String>, Item> {
        let Some(slot) = item.equip_slot() else {
            return Err(item);
        };
        let (attack, defense) = gear_bonus(&item);
        let replaced = self.equipment.replace(slot, item).map(|old| {
            let (old_attack, old_defense) = gear_bonus(&old);
            self.stats.attack -= old_attack;
            self.stats.defense -= old_defense;
            let name = old.name.clone();
            self.inventory.add(old);
            name
        });
        self.stats.attack += attack;
        self.stats.defense += defense;
        Ok(replaced)
    }

    /// Use or equip an inventory item. Errors leave the player untouched.
    pub fn use_item(&mut self, choice: ItemChoice) -> Result<ItemUse, ActionError> {
        let index = match choice {
            ItemChoice::Bag(index) => index,
            ItemChoice::Equipped(slot) => {
                let item = self.equipment.get(slot).ok_or(ActionError::InvalidSelection)?;
                return Err(ActionError::AlreadyEquipped(item.name.clone()));
            }
        };
        let kind = self.inventory.get(index).ok_or(ActionError::InvalidSelection)?.kind;

        match kind {
            ItemKind::Collectible => {
                let name = self.inventory.get(index).map(|i| i.name.clone()).unwrap_or_default();
                Err(ActionError::NotUsable(name))
            }
            ItemKind::Consumable(effect) => {
                let item = self.inventory.remove(index).ok_or(ActionError::InvalidSelection)?;
                let outcome = apply_consumable(self, effect);
                Ok(ItemUse::Consumed { name: item.name, outcome })
            }
            ItemKind::Weapon { .. } | ItemKind::Armor { .. } => {
                let item = self.inventory.remove(index).ok_or(ActionError::InvalidSelection)?;
                let name = item.name.clone();
                let replaced = self.equip(item).map_err(|item| ActionError::NotUsable(item.name))?;
                Ok(ItemUse::Equipped { name, replaced })
            }
        }
    }

    pub fn has_skill(&self, name: &str) -> bool {
        self.learned_skills.iter().any(|s| s.name == name)
    }

    /// Learn a skill; returns false if it was already known
    pub fn learn_skill(&mut self, skill: Skill) -> bool {
        if self.has_skill(&skill.name) {
            return false;
        }
        self.learned_skills.push(skill);
        true
    }

    /// Restore energy up to max, returning the amount restored
    pub fn restore_energy(&mut self, amount: i32) -> i32 {
        let actual = amount.max(0).min(self.max_energy - self.energy);
        self.energy += actual;
        actual
    }

    /// Take a breather, returning (hp restored, energy restored)
    pub fn rest(&mut self, hp: i32, energy: i32) -> (i32, i32) {
        (self.stats.heal(hp), self.restore_energy(energy))
    }

    /// Award XP, levelling up as many times as it covers
    pub fn add_xp(&mut self, amount: u32, catalog: &Catalog) -> Vec<LevelUp> {
        xp::add_xp(self, amount, catalog)
    }
}

impl Combatant for Player {
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

/// (attack, defense) granted by a piece of gear
fn gear_bonus(item: &Item) -> (i32, i32) {
    match item.kind {
        ItemKind::Weapon { damage_bonus } => (damage_bonus, 0),
        ItemKind::Armor { defense_bonus } => (0, defense_bonus),
        ItemKind::Consumable(_) | ItemKind::Collectible => (0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::templates;

    #[test]
    fn test_class_stats() {
        let soldier = Player::new("Rex", ClassType::Soldier);
        assert_eq!(soldier.stats.attack, 15);
        assert_eq!(soldier.stats.max_hp, 110);
        assert_eq!(soldier.stats.hp, 110);

        let engineer = Player::new("Ada", ClassType::Engineer);
        assert_eq!(engineer.stats.defense, 10);
        assert_eq!(engineer.stats.max_hp, 120);

        let scout = Player::new("Kit", ClassType::Scout);
        assert_eq!(scout.stats.speed, 15);
        assert_eq!(scout.stats.attack, 12);
    }

    #[test]
    fn test_starting_gear_is_equipped() {
        let player = Player::new("Rex", ClassType::Soldier).with_starting_gear(&Catalog::default());
        assert!(player.inventory.is_empty());
        assert_eq!(player.equipment.weapon().unwrap().name, "Laser Pistol");
        assert_eq!(player.equipment.armor().unwrap().name, "Scrap Armor");
        assert_eq!(player.stats.attack, 20);
        assert_eq!(player.stats.defense, 8);
    }

    #[test]
    fn test_equip_swaps_bonus_and_returns_old() {
        let mut player = Player::new("Rex", ClassType::Soldier).with_starting_gear(&Catalog::default());
        player.inventory.add(templates::plasma_rifle());

        let used = player.use_item(ItemChoice::Bag(0)).unwrap();
        assert_eq!(
            used,
            ItemUse::Equipped { name: "Plasma Rifle".into(), replaced: Some("Laser Pistol".into()) }
        );
        assert_eq!(player.stats.attack, 25);
        assert_eq!(player.inventory.items()[0].name, "Laser Pistol");
    }

    #[test]
    fn test_consumable_is_removed() {
        let mut player = Player::new("Rex", ClassType::Soldier);
        player.stats.take_damage(60);
        player.inventory.add(templates::health_potion());

        let used = player.use_item(ItemChoice::Bag(0)).unwrap();
        assert!(matches!(used, ItemUse::Consumed { .. }));
        assert_eq!(player.stats.hp, 100);
        assert!(player.inventory.is_empty());
    }

    #[test]
    fn test_blocked_item_actions() {
        let mut player = Player::new("Rex", ClassType::Soldier).with_starting_gear(&Catalog::default());
        player.inventory.add(templates::energy_crystal());

        assert_eq!(
            player.use_item(ItemChoice::Bag(0)),
            Err(ActionError::NotUsable("Energy Crystal".into()))
        );
        assert_eq!(
            player.use_item(ItemChoice::Equipped(EquipSlot::Weapon)),
            Err(ActionError::AlreadyEquipped("Laser Pistol".into()))
        );
        assert_eq!(player.use_item(ItemChoice::Bag(7)), Err(ActionError::InvalidSelection));
        assert_eq!(player.inventory.len(), 1);
    }

    #[test]
    fn test_learn_skill_is_idempotent() {
        let mut player = Player::new("Kit", ClassType::Scout);
        let skill = crate::progression::skills::skill_burst_of_speed();
        assert!(player.learn_skill(skill.clone()));
        assert!(!player.learn_skill(skill));
        assert_eq!(player.learned_skills.len(), 1);
    }

    #[test]
    fn test_rest_clamps() {
        let mut player = Player::new("Rex", ClassType::Soldier);
        player.stats.take_damage(5);
        player.energy = 45;
        assert_eq!(player.rest(15, 10), (5, 5));
    }
}
