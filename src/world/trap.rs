//! Floor traps

use crate::entities::{ClassType, Combatant, Player};
use super::map::Position;

/// What happened when a trap went off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapOutcome {
    Damaged(i32),
    /// Scouts spot traps and take no damage
    Evaded,
}

impl TrapOutcome {
    pub fn message(&self) -> String {
        match self {
            TrapOutcome::Damaged(amount) => format!("You stepped on a trap and took {} damage!", amount),
            TrapOutcome::Evaded => "Your scout training helps you evade the trap!".to_string(),
        }
    }
}

/// A hidden trap. Fires at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trap {
    pub position: Position,
    pub damage: i32,
    pub triggered: bool,
}

impl Trap {
    pub fn new(position: Position, damage: i32) -> Self {
        Self {
            position,
            damage,
            triggered: false,
        }
    }

    /// Fire the trap at `player`. Returns `None` if it already fired.
    pub fn trigger(&mut self, player: &mut Player) -> Option<TrapOutcome> {
        if self.triggered {
            return None;
        }
        self.triggered = true;

        if player.class_type == ClassType::Scout {
            Some(TrapOutcome::Evaded)
        } else {
            Some(TrapOutcome::Damaged(player.take_damage(self.damage)))
        }
    }
}
