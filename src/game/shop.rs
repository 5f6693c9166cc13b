//! The floor shop
//!
//! Stock is rolled from the catalog's loot entries each time the shop tile
//! is entered. Buying costs double the base value, selling pays it back.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::entities::{ItemChoice, Player};
use crate::error::ActionError;
use crate::items::{Catalog, Item};

/// Fewest and most distinct items on offer
pub const MIN_STOCK: usize = 3;
pub const MAX_STOCK: usize = 6;

/// A completed sale, as seen from the player's side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    pub item: String,
    pub credits: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shop {
    stock: Vec<Item>,
}

impl Shop {
    /// Roll a fresh selection of distinct items
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, catalog: &Catalog) -> Self {
        let table = catalog.loot_table();
        let count = rng.gen_range(MIN_STOCK..=MAX_STOCK).min(table.len());
        let stock = table
            .choose_multiple(rng, count)
            .map(|item| (*item).clone())
            .collect();
        Self { stock }
    }

    pub fn stock(&self) -> &[Item] {
        &self.stock
    }

    pub fn is_empty(&self) -> bool {
        self.stock.is_empty()
    }

    /// Buy the item at `index`; it leaves the shop's stock
    pub fn buy(&mut self, index: usize, player: &mut Player) -> Result<Trade, ActionError> {
        let item = self.stock.get(index).ok_or(ActionError::InvalidSelection)?;
        let price = item.buy_price();
        if player.credits < price {
            return Err(ActionError::NotEnoughCredits {
                item: item.name.clone(),
                price,
                credits: player.credits,
            });
        }

        let item = self.stock.remove(index);
        player.credits -= price;
        log::debug!("Bought {} for {}", item.name, price);
        let trade = Trade { item: item.name.clone(), credits: price };
        player.inventory.add(item);
        Ok(trade)
    }

    /// Sell an inventory item back at its base value
    pub fn sell(&mut self, choice: ItemChoice, player: &mut Player) -> Result<Trade, ActionError> {
        let index = match choice {
            ItemChoice::Bag(index) => index,
            ItemChoice::Equipped(slot) => {
                let item = player.equipment.get(slot).ok_or(ActionError::InvalidSelection)?;
                return Err(ActionError::CannotSellEquipped(item.name.clone()));
            }
        };
        let item = player.inventory.get(index).ok_or(ActionError::InvalidSelection)?;
        if item.is_collectible() {
            return Err(ActionError::CannotSellCollectible(item.name.clone()));
        }

        let item = player.inventory.remove(index).ok_or(ActionError::InvalidSelection)?;
        let value = item.sell_price();
        player.credits = player.credits.saturating_add(value);
        log::debug!("Sold {} for {}", item.name, value);
        Ok(Trade { item: item.name, credits: value })
    }
}

impl Trade {
    pub fn bought_message(&self) -> String {
        format!("You bought {} for {} Credits!", self.item, self.credits)
    }

    pub fn sold_message(&self) -> String {
        format!("You sold {} for {} Credits!", self.item, self.credits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ClassType;
    use crate::items::{templates, EquipSlot};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_stock_is_distinct_loot() {
        let catalog = Catalog::default();
        for seed in 0..30 {
            let mut rng = StdRng::seed_from_u64(seed);
            let shop = Shop::generate(&mut rng, &catalog);
            let names: HashSet<_> = shop.stock().iter().map(|i| i.name.as_str()).collect();
            assert!((MIN_STOCK..=MAX_STOCK).contains(&shop.stock().len()));
            assert_eq!(names.len(), shop.stock().len());
            assert!(shop.stock().iter().all(|i| !i.is_collectible()));
        }
    }

    #[test]
    fn test_buy_at_double_value() {
        let mut shop = Shop { stock: vec![templates::plasma_rifle(), templates::health_potion()] };
        let mut player = Player::new("Rex", ClassType::Soldier);
        player.credits = 50;

        let potion_price = templates::health_potion().base_value * 2;
        let trade = shop.buy(1, &mut player).unwrap();
        assert_eq!(trade.credits, potion_price);
        assert_eq!(player.credits, 50 - potion_price);
        assert_eq!(player.inventory.count("Health Potion"), 1);
        assert_eq!(shop.stock().len(), 1);

        let err = shop.buy(0, &mut player).unwrap_err();
        assert!(matches!(err, ActionError::NotEnoughCredits { .. }));
        assert_eq!(shop.stock().len(), 1);
        assert_eq!(shop.buy(5, &mut player), Err(ActionError::InvalidSelection));
    }

    #[test]
    fn test_sell_rules() {
        let catalog = Catalog::default();
        let mut shop = Shop::default();
        let mut player = Player::new("Rex", ClassType::Soldier).with_starting_gear(&catalog);
        player.inventory.add(templates::energy_crystal());
        player.inventory.add(templates::reinforced_vest());

        assert_eq!(
            shop.sell(ItemChoice::Bag(0), &mut player),
            Err(ActionError::CannotSellCollectible("Energy Crystal".into()))
        );
        assert_eq!(
            shop.sell(ItemChoice::Equipped(EquipSlot::Armor), &mut player),
            Err(ActionError::CannotSellEquipped("Scrap Armor".into()))
        );

        let trade = shop.sell(ItemChoice::Bag(1), &mut player).unwrap();
        assert_eq!(trade.credits, 50);
        assert_eq!(player.credits, 50);
        assert_eq!(player.inventory.len(), 1);
    }
}
