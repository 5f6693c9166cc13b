//! Enemy behaviour outside of combat
//!
//! Every living enemy either strikes an orthogonally adjacent player or
//! closes in one step, moving on both axes at once.

use crate::combat::attack_target;
use crate::entities::Player;
use crate::world::{Floor, Position};

/// Run one turn for every living enemy on the floor, returning the
/// attack messages. Stops early once the player is down.
pub fn run_enemy_turns(floor: &mut Floor, player: &mut Player) -> Vec<String> {
    let mut messages = Vec::new();
    let ids: Vec<_> = floor.entities.iter().map(|e| e.id).collect();

    for id in ids {
        if !player.stats.is_alive() {
            break;
        }
        let Some(enemy) = floor.enemy(id).filter(|e| e.stats.is_alive()) else {
            continue;
        };

        if enemy.position.is_orthogonally_adjacent(&player.position) {
            let result = attack_target(enemy, player);
            messages.push(result.message);
            continue;
        }

        let to = chase_step(enemy.position, player.position);
        if can_step(floor, to, player.position) {
            if let Some(enemy) = floor.enemy_mut(id) {
                enemy.position = to;
            }
        }
    }

    messages
}

/// One step toward the target on both axes
fn chase_step(from: Position, target: Position) -> Position {
    let dx = (target.x - from.x).signum();
    let dy = (target.y - from.y).signum();
    from.offset(dx, dy)
}

/// Check if a position is valid for an enemy to move to
fn can_step(floor: &Floor, to: Position, player: Position) -> bool {
    floor.is_walkable(to) && floor.enemy_at(to).is_none() && to != player
}
