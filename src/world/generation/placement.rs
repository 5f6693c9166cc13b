//! Feature placement
//!
//! Draws tiles from a shrinking pool so no two features share a square.

use rand::Rng;

use super::FloorRequest;
use crate::data::{EnemyTemplate, GameConfig};
use crate::entities::spawn_enemy;
use crate::error::GenerationError;
use crate::items::Catalog;
use crate::world::{Floor, Position, Trap};

/// Candidate tiles not yet claimed by a feature
#[derive(Debug, Clone)]
pub struct TilePool {
    tiles: Vec<Position>,
}

impl TilePool {
    pub fn from_floor(floor: &Floor) -> Self {
        Self { tiles: floor.floor_positions() }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Remove and return a uniformly chosen tile
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Position> {
        if self.tiles.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.tiles.len());
        Some(self.tiles.swap_remove(index))
    }

    /// Remove and return a uniformly chosen tile satisfying `accept`
    pub fn draw_where<R, F>(&mut self, rng: &mut R, accept: F) -> Option<Position>
    where
        R: Rng + ?Sized,
        F: Fn(Position) -> bool,
    {
        let candidates: Vec<usize> = (0..self.tiles.len()).filter(|&i| accept(self.tiles[i])).collect();
        if candidates.is_empty() {
            return None;
        }
        let index = candidates[rng.gen_range(0..candidates.len())];
        Some(self.tiles.swap_remove(index))
    }
}

/// Exit must be a quarter of the map away from the start on some axis
pub fn far_enough(start: Position, candidate: Position, width: i32, height: i32) -> bool {
    (candidate.x - start.x).abs() > width / 4 || (candidate.y - start.y).abs() > height / 4
}

/// Everything the feature pass needs besides the floor itself
pub struct PlacementContext<'a> {
    pub config: &'a GameConfig,
    pub catalog: &'a Catalog,
    pub enemies: &'a [EnemyTemplate],
    pub request: &'a FloorRequest,
}

/// Place start, exit, shop, traps, enemies, items and crystals
pub fn place_features<R: Rng + ?Sized>(
    rng: &mut R,
    floor: &mut Floor,
    ctx: &PlacementContext,
) -> Result<(), GenerationError> {
    let mut pool = TilePool::from_floor(floor);

    let start = pool.draw(rng).ok_or(GenerationError::EmptyTilePool)?;
    floor.player_start = start;

    let (width, height) = (floor.width, floor.height);
    floor.exit_location = pool
        .draw_where(rng, |p| far_enough(start, p, width, height))
        .ok_or(GenerationError::NoDistantExit)?;

    if ctx.request.wants_shop {
        floor.shop_location = pool.draw(rng);
        if floor.shop_location.is_none() {
            log::debug!("No room left for a shop on floor {}", floor.floor_index);
        }
    }

    let config = ctx.config;
    let trap_count = (pool.len() as f64 * config.trap_spawn_chance) as usize;
    for _ in 0..trap_count {
        let Some(pos) = pool.draw(rng) else { break };
        floor.traps_on_map.insert(pos, Trap::new(pos, config.trap_damage));
    }

    let enemy_count = rng.gen_range(1..=config.max_enemies_per_level.max(1));
    for _ in 0..enemy_count {
        if pool.is_empty() {
            break;
        }
        let Some(mut enemy) = spawn_enemy(
            rng,
            ctx.enemies,
            ctx.request.player_level,
            ctx.catalog,
            config.enemy_drop_chance,
        ) else {
            log::warn!("No enemy templates available");
            break;
        };
        if let Some(pos) = pool.draw(rng) {
            enemy.position = pos;
            floor.add_enemy(enemy);
        }
    }

    let item_count = rng.gen_range(0..=config.max_items_per_level);
    for _ in 0..item_count {
        if pool.is_empty() {
            break;
        }
        let Some(item) = ctx.catalog.random_loot(rng) else { break };
        if let Some(pos) = pool.draw(rng) {
            floor.items_on_map.insert(pos, item);
        }
    }

    let crystal_chance = config.crystal_chance(floor.floor_index);
    let attempts = rng.gen_range(0..=config.max_crystal_attempts);
    for _ in 0..attempts {
        if pool.is_empty() {
            break;
        }
        if rng.gen_bool(crystal_chance) {
            let (Some(crystal), Some(pos)) = (ctx.catalog.crystal(), pool.draw(rng)) else { break };
            floor.items_on_map.insert(pos, crystal);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_pool_draws_are_unique() {
        let mut floor = Floor::new(8, 8, 0);
        for x in 1..7 {
            floor.set_tile(x, 3, crate::world::TileType::Floor);
        }
        let mut pool = TilePool::from_floor(&floor);
        let mut rng = StdRng::seed_from_u64(5);

        let mut seen = Vec::new();
        while let Some(pos) = pool.draw(&mut rng) {
            assert!(!seen.contains(&pos));
            seen.push(pos);
        }
        assert_eq!(seen.len(), 6);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_draw_where_respects_filter() {
        let mut floor = Floor::new(8, 8, 0);
        for x in 1..7 {
            floor.set_tile(x, 3, crate::world::TileType::Floor);
        }
        let mut pool = TilePool::from_floor(&floor);
        let mut rng = StdRng::seed_from_u64(5);

        let pos = pool.draw_where(&mut rng, |p| p.x == 6).unwrap();
        assert_eq!(pos, Position::new(6, 3));
        assert!(pool.draw_where(&mut rng, |p| p.x == 6).is_none());
        assert_eq!(pool.len(), 5);
    }

    #[test]
    fn test_exit_separation_rule() {
        let start = Position::new(5, 5);
        assert!(far_enough(start, Position::new(16, 5), 40, 20));
        assert!(!far_enough(start, Position::new(15, 10), 40, 20));
        assert!(far_enough(start, Position::new(5, 11), 40, 20));
    }
}
