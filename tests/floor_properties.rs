//! Structural guarantees every generated floor must hold

use std::collections::{HashSet, VecDeque};

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use xylos::data::{default_enemy_templates, GameConfig};
use xylos::items::Catalog;
use xylos::world::{Floor, FloorGenerator, FloorRequest, Position, CARDINALS};

fn generate(seed: u64, level: u32, floor_index: u32) -> Floor {
    let config = GameConfig::default();
    let catalog = Catalog::default();
    let templates = default_enemy_templates();
    let generator = FloorGenerator::new(&config, &catalog, &templates.templates);
    let mut rng = StdRng::seed_from_u64(seed);
    generator
        .generate(&mut rng, &FloorRequest::for_floor(&config, level, floor_index))
        .expect("default config always yields a floor")
}

/// Floor tiles reachable from `start` with 4-directional moves
fn reachable(floor: &Floor, start: Position) -> HashSet<Position> {
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(pos) = queue.pop_front() {
        for (dx, dy) in CARDINALS {
            let next = pos.offset(dx, dy);
            if floor.is_walkable(next) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn rooms_keep_a_margin(seed in any::<u64>(), level in 1u32..10, floor_index in 0u32..15) {
        let floor = generate(seed, level, floor_index);
        for (i, a) in floor.rooms.iter().enumerate() {
            for b in &floor.rooms[i + 1..] {
                prop_assert!(!a.intersects_with_margin(b, 1), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn features_sit_on_distinct_floor_tiles(seed in any::<u64>(), level in 1u32..10, floor_index in 0u32..15) {
        let floor = generate(seed, level, floor_index);

        let mut features = vec![floor.player_start, floor.exit_location];
        features.extend(floor.shop_location);
        features.extend(floor.traps_on_map.keys().copied());
        features.extend(floor.entities.iter().map(|e| e.position));
        features.extend(floor.items_on_map.keys().copied());

        let distinct: HashSet<_> = features.iter().collect();
        prop_assert_eq!(distinct.len(), features.len());
        for pos in &features {
            prop_assert!(floor.is_walkable(*pos), "{:?} is not a floor tile", pos);
        }
        prop_assert_eq!(floor.shop_location.is_some(), GameConfig::default().wants_shop(floor_index));
    }

    #[test]
    fn exit_is_far_from_start(seed in any::<u64>(), floor_index in 0u32..15) {
        let floor = generate(seed, 1, floor_index);
        let dx = (floor.exit_location.x - floor.player_start.x).abs();
        let dy = (floor.exit_location.y - floor.player_start.y).abs();
        prop_assert!(dx > floor.width / 4 || dy > floor.height / 4);
    }

    #[test]
    fn every_floor_tile_is_reachable(seed in any::<u64>(), floor_index in 0u32..15) {
        let floor = generate(seed, 1, floor_index);
        let reached = reachable(&floor, floor.player_start);
        prop_assert_eq!(reached.len(), floor.floor_positions().len());
    }
}
