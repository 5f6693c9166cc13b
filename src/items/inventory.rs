//! Inventory management
//!
//! An ordered bag; order is acquisition order and is what the UI indexes.

use super::item::Item;

/// Player inventory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    items: Vec<Item>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item at the end
    pub fn add(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Remove and return the item at `index`
    pub fn remove(&mut self, index: usize) -> Option<Item> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items with the given name
    pub fn count(&self, name: &str) -> usize {
        self.items.iter().filter(|i| i.name == name).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::item::templates;

    #[test]
    fn test_order_is_acquisition_order() {
        let mut inv = Inventory::new();
        inv.add(templates::health_potion());
        inv.add(templates::plasma_rifle());
        inv.add(templates::health_potion());

        assert_eq!(inv.len(), 3);
        assert_eq!(inv.count("Health Potion"), 2);

        let removed = inv.remove(0).unwrap();
        assert_eq!(removed.name, "Health Potion");
        assert_eq!(inv.get(0).unwrap().name, "Plasma Rifle");
        assert!(inv.remove(5).is_none());
    }
}
