//! Progression systems

pub mod xp;
pub mod skills;

pub use xp::{add_xp, xp_for_level, LevelUp};
pub use skills::{default_skills, skill_unlock, Skill, SkillEffect};
