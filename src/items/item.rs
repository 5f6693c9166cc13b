//! Item definitions
//!
//! Items are a closed set of kinds: weapons, armor, consumables and the
//! collectible crystals needed to win.

use serde::{Deserialize, Serialize};

/// Equipment slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipSlot {
    Weapon,
    Armor,
}

impl EquipSlot {
    pub fn name(&self) -> &'static str {
        match self {
            EquipSlot::Weapon => "Weapon",
            EquipSlot::Armor => "Armor",
        }
    }
}

/// What a consumable does when used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsumableEffect {
    RestoreHp(i32),
    RestoreEnergy(i32),
}

/// Item kind, carrying only the data relevant to that kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Weapon { damage_bonus: i32 },
    Armor { defense_bonus: i32 },
    Consumable(ConsumableEffect),
    Collectible,
}

/// A game item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub description: String,
    /// Sell price; shops charge double
    pub base_value: u32,
    pub kind: ItemKind,
}

impl Item {
    pub fn new(name: &str, description: &str, base_value: u32, kind: ItemKind) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            base_value,
            kind,
        }
    }

    /// Price when bought from a shop
    pub fn buy_price(&self) -> u32 {
        self.base_value.saturating_mul(2)
    }

    /// Credits received when sold
    pub fn sell_price(&self) -> u32 {
        self.base_value
    }

    /// The slot this item occupies when equipped
    pub fn equip_slot(&self) -> Option<EquipSlot> {
        match self.kind {
            ItemKind::Weapon { .. } => Some(EquipSlot::Weapon),
            ItemKind::Armor { .. } => Some(EquipSlot::Armor),
            ItemKind::Consumable(_) | ItemKind::Collectible => None,
        }
    }

    pub fn is_collectible(&self) -> bool {
        matches!(self.kind, ItemKind::Collectible)
    }

    /// Short label used by inventory listings
    pub fn category_name(&self) -> &'static str {
        match self.kind {
            ItemKind::Weapon { .. } => "Weapon",
            ItemKind::Armor { .. } => "Armor",
            ItemKind::Consumable(_) => "Consumable",
            ItemKind::Collectible => "Collectible",
        }
    }

    /// One-line effect summary, e.g. "+5 DMG"
    pub fn effect_label(&self) -> String {
        match self.kind {
            ItemKind::Weapon { damage_bonus } => format!("+{} DMG", damage_bonus),
            ItemKind::Armor { defense_bonus } => format!("+{} DEF", defense_bonus),
            ItemKind::Consumable(ConsumableEffect::RestoreHp(n)) => format!("+{} HP", n),
            ItemKind::Consumable(ConsumableEffect::RestoreEnergy(n)) => format!("+{} EN", n),
            ItemKind::Collectible => "Objective".to_string(),
        }
    }
}

/// Built-in item definitions
pub mod templates {
    use super::*;

    pub fn health_potion() -> Item {
        Item::new(
            "Health Potion",
            "Restores 50 HP.",
            20,
            ItemKind::Consumable(ConsumableEffect::RestoreHp(50)),
        )
    }

    pub fn energy_cell() -> Item {
        Item::new(
            "Energy Cell",
            "Restores 25 HP.",
            15,
            ItemKind::Consumable(ConsumableEffect::RestoreHp(25)),
        )
    }

    pub fn energy_pack() -> Item {
        Item::new(
            "Energy Pack",
            "Restores 40 Energy.",
            25,
            ItemKind::Consumable(ConsumableEffect::RestoreEnergy(40)),
        )
    }

    pub fn energy_crystal() -> Item {
        Item::new(
            "Energy Crystal",
            "A shimmering crystal, vital for your mission.",
            100,
            ItemKind::Collectible,
        )
    }

    pub fn laser_pistol() -> Item {
        Item::new(
            "Laser Pistol",
            "A standard issue laser pistol.",
            30,
            ItemKind::Weapon { damage_bonus: 5 },
        )
    }

    pub fn plasma_rifle() -> Item {
        Item::new(
            "Plasma Rifle",
            "A powerful plasma rifle.",
            60,
            ItemKind::Weapon { damage_bonus: 10 },
        )
    }

    pub fn scrap_armor() -> Item {
        Item::new(
            "Scrap Armor",
            "Crude armor made from salvaged parts.",
            25,
            ItemKind::Armor { defense_bonus: 3 },
        )
    }

    pub fn reinforced_vest() -> Item {
        Item::new(
            "Reinforced Vest",
            "A vest offering decent protection.",
            50,
            ItemKind::Armor { defense_bonus: 7 },
        )
    }

    /// Every built-in item, in catalog order
    pub fn all() -> Vec<Item> {
        vec![
            health_potion(),
            energy_cell(),
            energy_pack(),
            energy_crystal(),
            laser_pistol(),
            plasma_rifle(),
            scrap_armor(),
            reinforced_vest(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prices() {
        let rifle = templates::plasma_rifle();
        assert_eq!(rifle.sell_price(), 60);
        assert_eq!(rifle.buy_price(), 120);
    }

    #[test]
    fn test_equip_slots() {
        assert_eq!(templates::laser_pistol().equip_slot(), Some(EquipSlot::Weapon));
        assert_eq!(templates::scrap_armor().equip_slot(), Some(EquipSlot::Armor));
        assert_eq!(templates::health_potion().equip_slot(), None);
        assert_eq!(templates::energy_crystal().equip_slot(), None);
        assert!(templates::energy_crystal().is_collectible());
    }
}
