//! Combat system
//!
//! Damage rules, consumable and skill effects, and the turn-by-turn
//! encounter state machine.

pub mod damage;
pub mod effects;
pub mod encounter;

pub use damage::{attack_target, damage, flee_chance, AttackResult};
pub use effects::{apply_consumable, apply_skill, CombatBoost, EffectOutcome, SkillOutcome};
pub use encounter::{Arena, CombatOutcome, CombatReport, CombatState, Encounter, PlayerAction, Rewards};
