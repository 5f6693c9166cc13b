//! Tile definitions
//!
//! Terrain types plus the render cell that a floor position resolves to.

use serde::{Deserialize, Serialize};

/// Terrain of a single map square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileType {
    #[default]
    Wall,
    Floor,
}

impl TileType {
    pub fn is_walkable(&self) -> bool {
        matches!(self, TileType::Floor)
    }

    pub fn glyph(&self) -> char {
        match self {
            TileType::Wall => '#',
            TileType::Floor => '.',
        }
    }
}

/// What is drawn at a map position, after display precedence is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Player,
    Exit,
    Shop,
    Crystal,
    Item,
    Trap,
    Enemy(char),
    Terrain(TileType),
}

impl Cell {
    pub fn glyph(&self) -> char {
        match self {
            Cell::Player => '@',
            Cell::Exit => 'E',
            Cell::Shop => 'S',
            Cell::Crystal => 'C',
            Cell::Item => 'I',
            Cell::Trap => '^',
            Cell::Enemy(glyph) => *glyph,
            Cell::Terrain(tile) => tile.glyph(),
        }
    }

    /// Foreground color (RGB)
    pub fn fg_color(&self) -> (u8, u8, u8) {
        match self {
            Cell::Player | Cell::Exit => (0, 220, 220),
            Cell::Shop => (80, 120, 255),
            Cell::Crystal => (220, 80, 220),
            Cell::Item => (230, 210, 60),
            Cell::Trap => (230, 230, 230),
            Cell::Enemy(_) => (220, 60, 60),
            Cell::Terrain(TileType::Floor) => (120, 120, 120),
            Cell::Terrain(TileType::Wall) => (90, 90, 110),
        }
    }
}
