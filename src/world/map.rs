//! Floor data structure
//!
//! The tile grid of one dungeon level plus everything placed on it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::generation::Room;
use super::tile::{Cell, TileType};
use super::trap::{Trap, TrapOutcome};
use crate::entities::{Enemy, EnemyId, Player};
use crate::items::Item;

/// The four orthogonal step directions
pub const CARDINALS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Manhattan distance to another position
    pub fn distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn euclidean_distance(&self, other: &Position) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// Exactly one step away on one axis; diagonals do not count
    pub fn is_orthogonally_adjacent(&self, other: &Position) -> bool {
        self.distance(other) == 1
    }
}

/// One generated dungeon level
#[derive(Debug, Clone)]
pub struct Floor {
    pub width: i32,
    pub height: i32,
    pub tiles: Vec<TileType>,
    /// Depth, starting at 0
    pub floor_index: u32,
    pub rooms: Vec<Room>,
    pub player_start: Position,
    pub exit_location: Position,
    pub shop_location: Option<Position>,
    pub entities: Vec<Enemy>,
    pub items_on_map: HashMap<Position, Item>,
    pub traps_on_map: HashMap<Position, Trap>,
    next_enemy_id: EnemyId,
}

impl Floor {
    /// Create a floor filled with walls
    pub fn new(width: i32, height: i32, floor_index: u32) -> Self {
        let size = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            tiles: vec![TileType::Wall; size],
            floor_index,
            rooms: Vec::new(),
            player_start: Position::default(),
            exit_location: Position::default(),
            shop_location: None,
            entities: Vec::new(),
            items_on_map: HashMap::new(),
            traps_on_map: HashMap::new(),
            next_enemy_id: 1,
        }
    }

    /// Convert 2D coordinates to 1D index
    #[inline]
    pub fn xy_to_idx(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<TileType> {
        if self.in_bounds(x, y) {
            Some(self.tiles[self.xy_to_idx(x, y)])
        } else {
            None
        }
    }

    pub fn set_tile(&mut self, x: i32, y: i32, tile_type: TileType) {
        if self.in_bounds(x, y) {
            let idx = self.xy_to_idx(x, y);
            self.tiles[idx] = tile_type;
        }
    }

    /// In bounds and not a wall
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.tile(pos.x, pos.y).is_some_and(|t| t.is_walkable())
    }

    /// Every floor tile, row by row
    pub fn floor_positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.tiles[self.xy_to_idx(x, y)].is_walkable() {
                    positions.push(Position::new(x, y));
                }
            }
        }
        positions
    }

    /// Put an enemy on the floor, assigning it an id
    pub fn add_enemy(&mut self, mut enemy: Enemy) -> EnemyId {
        let id = self.next_enemy_id;
        self.next_enemy_id += 1;
        enemy.id = id;
        self.entities.push(enemy);
        id
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Living enemy standing at `pos`
    pub fn enemy_at(&self, pos: Position) -> Option<&Enemy> {
        self.entities
            .iter()
            .find(|e| e.position == pos && e.stats.is_alive())
    }

    pub fn remove_enemy(&mut self, id: EnemyId) -> Option<Enemy> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(index))
    }

    /// Drop every dead enemy from the floor, returning them
    pub fn remove_dead_enemies(&mut self) -> Vec<Enemy> {
        let (alive, dead) = std::mem::take(&mut self.entities)
            .into_iter()
            .partition(|e| e.stats.is_alive());
        self.entities = alive;
        dead
    }

    /// Nearest living enemy by straight-line distance
    pub fn nearest_enemy(&self, from: Position) -> Option<(&Enemy, f64)> {
        self.entities
            .iter()
            .filter(|e| e.stats.is_alive())
            .map(|e| (e, from.euclidean_distance(&e.position)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Orthogonal neighbours of `pos` that are floor and free of living enemies
    pub fn open_neighbours(&self, pos: Position) -> Vec<Position> {
        CARDINALS
            .iter()
            .map(|&(dx, dy)| pos.offset(dx, dy))
            .filter(|p| self.is_walkable(*p) && self.enemy_at(*p).is_none())
            .collect()
    }

    /// Fire the trap at `pos`, if any. The trap is removed from the floor.
    pub fn trigger_trap(&mut self, pos: Position, player: &mut Player) -> Option<TrapOutcome> {
        let mut trap = self.traps_on_map.remove(&pos)?;
        trap.trigger(player)
    }

    /// Pick up whatever lies at `pos`
    pub fn take_item(&mut self, pos: Position) -> Option<Item> {
        self.items_on_map.remove(&pos)
    }

    /// Resolve what to draw at `pos`, with player > exit > shop > item >
    /// trap > enemy > terrain
    pub fn cell_at(&self, pos: Position, player_pos: Position) -> Cell {
        if pos == player_pos {
            return Cell::Player;
        }
        if pos == self.exit_location {
            return Cell::Exit;
        }
        if self.shop_location == Some(pos) {
            return Cell::Shop;
        }
        if let Some(item) = self.items_on_map.get(&pos) {
            return if item.is_collectible() { Cell::Crystal } else { Cell::Item };
        }
        if self.traps_on_map.get(&pos).is_some_and(|t| !t.triggered) {
            return Cell::Trap;
        }
        if let Some(enemy) = self.enemy_at(pos) {
            return Cell::Enemy(enemy.symbol);
        }
        Cell::Terrain(self.tile(pos.x, pos.y).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::enemies::default_enemy_templates;
    use crate::entities::ClassType;
    use crate::items::templates;

    fn open_floor() -> Floor {
        let mut floor = Floor::new(10, 6, 0);
        for y in 1..5 {
            for x in 1..9 {
                floor.set_tile(x, y, TileType::Floor);
            }
        }
        floor.player_start = Position::new(1, 1);
        floor.exit_location = Position::new(8, 4);
        floor
    }

    fn drone_at(pos: Position) -> Enemy {
        let templates = default_enemy_templates();
        let mut enemy = Enemy::from_template(&templates.templates[0], 1);
        enemy.position = pos;
        enemy
    }

    #[test]
    fn test_bounds_and_walls() {
        let floor = open_floor();
        assert!(floor.is_walkable(Position::new(1, 1)));
        assert!(!floor.is_walkable(Position::new(0, 0)));
        assert!(!floor.is_walkable(Position::new(-1, 3)));
        assert!(!floor.is_walkable(Position::new(10, 3)));
        assert_eq!(floor.floor_positions().len(), 32);
    }

    #[test]
    fn test_display_precedence() {
        let mut floor = open_floor();
        let pos = Position::new(4, 2);
        floor.add_enemy(drone_at(pos));
        assert_eq!(floor.cell_at(pos, floor.player_start), Cell::Enemy('D'));

        floor.traps_on_map.insert(pos, Trap::new(pos, 15));
        assert_eq!(floor.cell_at(pos, floor.player_start), Cell::Trap);

        floor.items_on_map.insert(pos, templates::energy_crystal());
        assert_eq!(floor.cell_at(pos, floor.player_start), Cell::Crystal);

        floor.shop_location = Some(pos);
        assert_eq!(floor.cell_at(pos, floor.player_start), Cell::Shop);

        assert_eq!(floor.cell_at(floor.exit_location, floor.player_start), Cell::Exit);
        assert_eq!(floor.cell_at(pos, pos), Cell::Player);
    }

    #[test]
    fn test_trap_removed_on_trigger() {
        let mut floor = open_floor();
        let mut player = Player::new("Rex", ClassType::Engineer);
        let pos = Position::new(3, 3);
        floor.traps_on_map.insert(pos, Trap::new(pos, 15));

        assert_eq!(floor.trigger_trap(pos, &mut player), Some(TrapOutcome::Damaged(15)));
        assert_eq!(floor.trigger_trap(pos, &mut player), None);
        assert_eq!(player.stats.hp, player.stats.max_hp - 15);
        assert!(floor.traps_on_map.is_empty());
    }

    #[test]
    fn test_enemy_bookkeeping() {
        let mut floor = open_floor();
        let a = floor.add_enemy(drone_at(Position::new(2, 2)));
        let b = floor.add_enemy(drone_at(Position::new(7, 2)));
        assert_ne!(a, b);

        floor.enemy_mut(a).unwrap().stats.take_damage(100);
        assert!(floor.enemy_at(Position::new(2, 2)).is_none());

        let (nearest, _) = floor.nearest_enemy(Position::new(1, 1)).unwrap();
        assert_eq!(nearest.id, b);

        let dead = floor.remove_dead_enemies();
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].id, a);
        assert_eq!(floor.entities.len(), 1);
    }

    #[test]
    fn test_open_neighbours_skip_enemies_and_walls() {
        let mut floor = open_floor();
        floor.add_enemy(drone_at(Position::new(2, 1)));
        let open = floor.open_neighbours(Position::new(1, 1));
        assert_eq!(open, vec![Position::new(1, 2)]);
    }

    #[test]
    fn test_adjacency_is_orthogonal() {
        let p = Position::new(5, 5);
        assert!(p.is_orthogonally_adjacent(&Position::new(5, 6)));
        assert!(!p.is_orthogonally_adjacent(&Position::new(6, 6)));
        assert!(!p.is_orthogonally_adjacent(&p));
    }
}
