//! Item system

pub mod item;
pub mod catalog;
pub mod inventory;
pub mod equipment;

pub use item::{Item, ItemKind, ConsumableEffect, EquipSlot, templates};
pub use catalog::Catalog;
pub use inventory::Inventory;
pub use equipment::Equipment;
