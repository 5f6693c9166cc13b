//! Equipment slots
//!
//! Holds the equipped weapon and armor. Stat bonuses are applied by the
//! player when swapping, not recomputed from here.

use super::item::{EquipSlot, Item};

/// Player equipment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Equipment {
    weapon: Option<Item>,
    armor: Option<Item>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipSlot) -> Option<&Item> {
        match slot {
            EquipSlot::Weapon => self.weapon.as_ref(),
            EquipSlot::Armor => self.armor.as_ref(),
        }
    }

    pub fn weapon(&self) -> Option<&Item> {
        self.weapon.as_ref()
    }

    pub fn armor(&self) -> Option<&Item> {
        self.armor.as_ref()
    }

    /// Put `item` in `slot`, returning whatever was there
    pub fn replace(&mut self, slot: EquipSlot, item: Item) -> Option<Item> {
        match slot {
            EquipSlot::Weapon => self.weapon.replace(item),
            EquipSlot::Armor => self.armor.replace(item),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::item::templates;

    #[test]
    fn test_replace_returns_previous() {
        let mut eq = Equipment::new();
        assert!(eq.replace(EquipSlot::Weapon, templates::laser_pistol()).is_none());

        let old = eq.replace(EquipSlot::Weapon, templates::plasma_rifle());
        assert_eq!(old.unwrap().name, "Laser Pistol");
        assert_eq!(eq.weapon().unwrap().name, "Plasma Rifle");
        assert!(eq.get(EquipSlot::Armor).is_none());
    }
}
