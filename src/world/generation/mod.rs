//! Procedural floor generation
//!
//! Rooms are laid out and chained first, then features are dropped onto
//! the remaining floor tiles. A layout that leaves no room for the
//! mandatory features is thrown away and rebuilt, up to a fixed budget.

pub mod rooms;
pub mod placement;

pub use rooms::Room;

use rand::Rng;

use crate::data::{EnemyTemplate, GameConfig};
use crate::error::GenerationError;
use crate::items::Catalog;
use super::Floor;
use placement::PlacementContext;

/// Parameters for one floor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloorRequest {
    pub width: i32,
    pub height: i32,
    pub player_level: u32,
    pub floor_index: u32,
    pub wants_shop: bool,
}

impl FloorRequest {
    /// A request sized from the config, with the shop rule applied
    pub fn for_floor(config: &GameConfig, player_level: u32, floor_index: u32) -> Self {
        Self {
            width: config.map_width,
            height: config.map_height,
            player_level,
            floor_index,
            wants_shop: config.wants_shop(floor_index),
        }
    }
}

/// Builds floors from the loaded game data
pub struct FloorGenerator<'a> {
    config: &'a GameConfig,
    catalog: &'a Catalog,
    enemies: &'a [EnemyTemplate],
}

impl<'a> FloorGenerator<'a> {
    pub fn new(config: &'a GameConfig, catalog: &'a Catalog, enemies: &'a [EnemyTemplate]) -> Self {
        Self { config, catalog, enemies }
    }

    /// Generate a floor, retrying degenerate layouts
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, request: &FloorRequest) -> Result<Floor, GenerationError> {
        let attempts = self.config.max_generation_attempts.max(1);
        let mut last = GenerationError::EmptyTilePool;

        for attempt in 1..=attempts {
            match self.try_generate(rng, request) {
                Ok(floor) => {
                    log::debug!(
                        "Generated floor {} ({} rooms, {} enemies) on attempt {}",
                        request.floor_index,
                        floor.rooms.len(),
                        floor.entities.len(),
                        attempt
                    );
                    return Ok(floor);
                }
                Err(e) => {
                    log::debug!("Floor {} attempt {} rejected: {}", request.floor_index, attempt, e);
                    last = e;
                }
            }
        }

        log::error!("Giving up on floor {} after {} attempts", request.floor_index, attempts);
        Err(GenerationError::Exhausted { attempts, last: Box::new(last) })
    }

    fn try_generate<R: Rng + ?Sized>(&self, rng: &mut R, request: &FloorRequest) -> Result<Floor, GenerationError> {
        let mut floor = Floor::new(request.width, request.height, request.floor_index);

        let mut rooms = rooms::place_rooms(rng, &mut floor, self.config);
        rooms::connect_rooms(&mut floor, &mut rooms);
        floor.rooms = rooms;

        let ctx = PlacementContext {
            config: self.config,
            catalog: self.catalog,
            enemies: self.enemies,
            request,
        };
        placement::place_features(rng, &mut floor, &ctx)?;
        Ok(floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::enemies::default_enemy_templates;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_default_floor() {
        let config = GameConfig::default();
        let catalog = Catalog::default();
        let templates = default_enemy_templates();
        let generator = FloorGenerator::new(&config, &catalog, &templates.templates);
        let mut rng = StdRng::seed_from_u64(42);

        let floor = generator.generate(&mut rng, &FloorRequest::for_floor(&config, 1, 0)).unwrap();
        assert!(!floor.rooms.is_empty());
        assert!(!floor.entities.is_empty());
        assert!(floor.entities.len() <= config.max_enemies_per_level as usize);
        assert!(floor.shop_location.is_none());
        assert_ne!(floor.player_start, floor.exit_location);
    }

    #[test]
    fn test_shop_floor() {
        let config = GameConfig::default();
        let catalog = Catalog::default();
        let templates = default_enemy_templates();
        let generator = FloorGenerator::new(&config, &catalog, &templates.templates);
        let mut rng = StdRng::seed_from_u64(9);

        let floor = generator.generate(&mut rng, &FloorRequest::for_floor(&config, 3, 5)).unwrap();
        let shop = floor.shop_location.unwrap();
        assert!(floor.is_walkable(shop));
        assert_ne!(shop, floor.player_start);
        assert_ne!(shop, floor.exit_location);
    }

    #[test]
    fn test_same_seed_same_floor() {
        let config = GameConfig::default();
        let catalog = Catalog::default();
        let templates = default_enemy_templates();
        let generator = FloorGenerator::new(&config, &catalog, &templates.templates);
        let request = FloorRequest::for_floor(&config, 2, 3);

        let a = generator.generate(&mut StdRng::seed_from_u64(77), &request).unwrap();
        let b = generator.generate(&mut StdRng::seed_from_u64(77), &request).unwrap();
        assert_eq!(a.tiles, b.tiles);
        assert_eq!(a.player_start, b.player_start);
        assert_eq!(a.entities, b.entities);
    }

    #[test]
    fn test_impossible_map_fails_loudly() {
        let config = GameConfig { max_generation_attempts: 5, ..GameConfig::default() };
        let catalog = Catalog::default();
        let templates = default_enemy_templates();
        let generator = FloorGenerator::new(&config, &catalog, &templates.templates);
        let request = FloorRequest { width: 6, height: 6, player_level: 1, floor_index: 0, wants_shop: false };

        let err = generator.generate(&mut StdRng::seed_from_u64(1), &request).unwrap_err();
        assert_eq!(
            err,
            GenerationError::Exhausted { attempts: 5, last: Box::new(GenerationError::EmptyTilePool) }
        );
    }
}
