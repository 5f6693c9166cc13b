//! Room and corridor layout
//!
//! Rectangular rooms placed by rejection sampling, then chained together
//! left to right with L-shaped corridors.

use rand::Rng;

use crate::data::GameConfig;
use crate::world::{Floor, Position, TileType};

/// A rectangular room; `x2`/`y2` are exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Room {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Room {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    pub fn center(&self) -> Position {
        Position::new((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }

    /// Overlap test with both rooms grown by `margin` tiles
    pub fn intersects_with_margin(&self, other: &Room, margin: i32) -> bool {
        self.x1 <= other.x2 + margin
            && self.x2 >= other.x1 - margin
            && self.y1 <= other.y2 + margin
            && self.y2 >= other.y1 - margin
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.x1 && pos.x < self.x2 && pos.y >= self.y1 && pos.y < self.y2
    }
}

/// Try `max_rooms` candidates; colliding candidates are dropped, not retried
pub fn place_rooms<R: Rng + ?Sized>(rng: &mut R, floor: &mut Floor, config: &GameConfig) -> Vec<Room> {
    let mut rooms: Vec<Room> = Vec::new();
    let min = config.room_min_size.max(1);
    let max = config.room_max_size.max(min);

    for _ in 0..config.max_rooms {
        let w = rng.gen_range(min..=max);
        let h = rng.gen_range(min..=max);

        // Keep a one tile wall border
        let max_x = floor.width - w - 1;
        let max_y = floor.height - h - 1;
        if max_x < 1 || max_y < 1 {
            continue;
        }
        let x = rng.gen_range(1..=max_x);
        let y = rng.gen_range(1..=max_y);

        let new_room = Room::new(x, y, w, h);
        if rooms.iter().any(|r| new_room.intersects_with_margin(r, 1)) {
            continue;
        }

        carve_room(floor, &new_room);
        rooms.push(new_room);
    }

    rooms
}

/// Sort rooms by left edge and join each consecutive pair
pub fn connect_rooms(floor: &mut Floor, rooms: &mut [Room]) {
    rooms.sort_by_key(|r| r.x1);

    for pair in rooms.windows(2) {
        let from = pair[0].center();
        let to = pair[1].center();
        carve_h_corridor(floor, from.x, to.x, from.y);
        carve_v_corridor(floor, from.y, to.y, to.x);
    }
}

/// Carve out a room
fn carve_room(floor: &mut Floor, room: &Room) {
    for y in room.y1..room.y2 {
        for x in room.x1..room.x2 {
            floor.set_tile(x, y, TileType::Floor);
        }
    }
}

/// Carve a horizontal corridor
fn carve_h_corridor(floor: &mut Floor, x1: i32, x2: i32, y: i32) {
    for x in x1.min(x2)..=x1.max(x2) {
        floor.set_tile(x, y, TileType::Floor);
    }
}

/// Carve a vertical corridor
fn carve_v_corridor(floor: &mut Floor, y1: i32, y2: i32, x: i32) {
    for y in y1.min(y2)..=y1.max(y2) {
        floor.set_tile(x, y, TileType::Floor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_room_center_is_inside() {
        let room = Room::new(2, 3, 5, 5);
        assert_eq!(room.center(), Position::new(4, 5));
        assert!(room.contains(room.center()));
    }

    #[test]
    fn test_margin_overlap() {
        let a = Room::new(1, 1, 5, 5);
        // Touching once grown by one tile
        let b = Room::new(7, 1, 5, 5);
        let c = Room::new(8, 1, 5, 5);
        assert!(a.intersects_with_margin(&b, 1));
        assert!(!a.intersects_with_margin(&c, 1));
        assert!(!c.intersects_with_margin(&a, 1));
    }

    #[test]
    fn test_rooms_stay_inside_border() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let mut floor = Floor::new(config.map_width, config.map_height, 0);
            let rooms = place_rooms(&mut rng, &mut floor, &config);
            assert!(!rooms.is_empty());
            for room in &rooms {
                assert!(room.x1 >= 1 && room.y1 >= 1);
                assert!(room.x2 <= floor.width - 1 && room.y2 <= floor.height - 1);
            }
            for x in 0..floor.width {
                assert_eq!(floor.tile(x, 0), Some(TileType::Wall));
                assert_eq!(floor.tile(x, floor.height - 1), Some(TileType::Wall));
            }
        }
    }

    #[test]
    fn test_corridor_joins_centers() {
        let mut floor = Floor::new(30, 15, 0);
        let mut rooms = vec![Room::new(18, 8, 5, 5), Room::new(2, 2, 5, 5)];
        for room in &rooms {
            carve_room(&mut floor, room);
        }
        connect_rooms(&mut floor, &mut rooms);

        assert_eq!(rooms[0].x1, 2);
        let (a, b) = (rooms[0].center(), rooms[1].center());
        for x in a.x..=b.x {
            assert_eq!(floor.tile(x, a.y), Some(TileType::Floor));
        }
        for y in a.y..=b.y {
            assert_eq!(floor.tile(b.x, y), Some(TileType::Floor));
        }
    }

    #[test]
    fn test_tiny_map_places_nothing() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut floor = Floor::new(6, 6, 0);
        assert!(place_rooms(&mut rng, &mut floor, &config).is_empty());
        assert!(floor.floor_positions().is_empty());
    }
}
