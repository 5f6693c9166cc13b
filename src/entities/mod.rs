//! Player and enemy models

pub mod stats;
pub mod player;
pub mod enemies;

pub use stats::{Combatant, Stats};
pub use player::{ClassType, ItemChoice, ItemUse, Player};
pub use enemies::{spawn_enemy, Enemy, EnemyId};
