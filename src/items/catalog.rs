//! Item and skill registry
//!
//! Built once at startup and passed explicitly to whatever needs to look
//! definitions up by name (spawning, shops, save restoration).

use rand::seq::SliceRandom;
use rand::Rng;

use super::item::{templates, Item};
use crate::progression::skills::{default_skills, Skill};

/// Immutable registry of item and skill definitions
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    items: Vec<Item>,
    skills: Vec<Skill>,
}

impl Catalog {
    pub fn new(items: Vec<Item>, skills: Vec<Skill>) -> Self {
        Self { items, skills }
    }

    /// Fresh instance of the named item
    pub fn item(&self, name: &str) -> Option<Item> {
        self.items.iter().find(|i| i.name == name).cloned()
    }

    pub fn skill(&self, name: &str) -> Option<Skill> {
        self.skills.iter().find(|s| s.name == name).cloned()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    /// Everything that can drop, lie on the floor or be sold in a shop
    pub fn loot_table(&self) -> Vec<&Item> {
        self.items.iter().filter(|i| !i.is_collectible()).collect()
    }

    /// A uniformly chosen loot item
    pub fn random_loot<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Item> {
        self.loot_table().choose(rng).map(|item| (*item).clone())
    }

    /// The objective collectible
    pub fn crystal(&self) -> Option<Item> {
        self.items.iter().find(|i| i.is_collectible()).cloned()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(templates::all(), default_skills())
    }
}
