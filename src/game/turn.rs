//! Turn management for combat
//!
//! Handles turn order and round flow for a one-on-one encounter.

/// Who acts in a combat step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player,
    Enemy,
}

/// Manages turn order during combat
#[derive(Debug, Clone)]
pub struct TurnManager {
    /// Combatants in turn order (sorted by speed)
    turn_order: Vec<Side>,
    /// Index of current combatant's turn
    current_index: usize,
    /// Current round number
    round: u32,
}

impl TurnManager {
    /// Create a new turn manager
    pub fn new() -> Self {
        Self {
            turn_order: Vec::new(),
            current_index: 0,
            round: 0,
        }
    }

    /// Start a new round with combatants sorted by speed. The sort is
    /// stable, so on ties the player (listed first) acts first.
    pub fn start_round(&mut self, player_speed: i32, enemy_speed: i32) {
        let mut combatants = vec![(Side::Player, player_speed), (Side::Enemy, enemy_speed)];
        // Sort by speed (higher = earlier in turn order)
        combatants.sort_by(|a, b| b.1.cmp(&a.1));
        self.turn_order = combatants.into_iter().map(|(side, _)| side).collect();
        self.current_index = 0;
        self.round += 1;
    }

    /// Get the side whose turn it is
    pub fn current(&self) -> Option<Side> {
        self.turn_order.get(self.current_index).copied()
    }

    /// Advance to the next step; returns false once the round is exhausted
    pub fn next_turn(&mut self) -> bool {
        self.current_index += 1;
        self.current_index < self.turn_order.len()
    }

    /// Get current round number
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn order(&self) -> &[Side] {
        &self.turn_order
    }
}

impl Default for TurnManager {
    fn default() -> Self {
        Self::new()
    }
}
