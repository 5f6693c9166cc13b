//! Whole-game scenarios driven through the public API

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;

use xylos::combat::{Arena, CombatOutcome, CombatState, Encounter, PlayerAction};
use xylos::data::{default_enemy_templates, DataManager};
use xylos::entities::{ClassType, Enemy, Player};
use xylos::game::{Game, GameState, PlayingState};
use xylos::items::Catalog;
use xylos::world::{Floor, Position, TileType};

fn open_room() -> Floor {
    let mut floor = Floor::new(10, 6, 0);
    for y in 1..5 {
        for x in 1..9 {
            floor.set_tile(x, y, TileType::Floor);
        }
    }
    floor
}

#[test]
fn soldier_beats_a_scavenger() {
    let catalog = Catalog::default();
    let mut floor = open_room();
    let mut player = Player::new("Rex", ClassType::Soldier);
    player.position = Position::new(2, 2);
    assert_eq!(player.stats.attack, 15);
    assert_eq!(player.stats.max_hp, 110);

    let templates = default_enemy_templates();
    let mut scavenger = Enemy::from_template(templates.find("Mutant Scavenger").unwrap(), 1);
    assert_eq!(scavenger.stats.defense, 5);
    scavenger.position = Position::new(3, 2);
    let id = floor.add_enemy(scavenger);

    let mut rng = StdRng::seed_from_u64(7);
    let mut arena = Arena { player: &mut player, floor: &mut floor, catalog: &catalog };
    let (mut encounter, _) = Encounter::engage(id, &mut arena);

    encounter.act(PlayerAction::Attack, &mut arena, &mut rng).unwrap();
    assert_eq!(arena.floor.enemy(id).unwrap().stats.hp, 30);

    let mut last = None;
    while encounter.is_active() {
        last = Some(encounter.act(PlayerAction::Attack, &mut arena, &mut rng).unwrap());
    }
    assert_eq!(encounter.state(), CombatState::Over(CombatOutcome::EnemyDefeated));
    let rewards = last.unwrap().rewards.unwrap();
    assert_eq!((rewards.xp, rewards.credits), (30, 8));

    assert!(floor.entities.is_empty());
    assert_eq!(player.xp, 30);
    assert_eq!(player.credits, 8);
    // Three scavenger hits of 12 - 5
    assert_eq!(player.stats.hp, 110 - 21);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Random play never leaves the player in an impossible state
    #[test]
    fn random_play_keeps_invariants(seed in any::<u64>(), commands in prop::collection::vec(0u8..8, 1..200)) {
        let dir = tempdir().unwrap();
        let mut game = Game::with_data(DataManager::default(), Some(seed), dir.path().join("savegame.json"));
        game.start_new_run("Fuzz", ClassType::Scout).unwrap();

        for command in commands {
            match game.state().clone() {
                GameState::Playing(PlayingState::Exploring) => match command {
                    0 => game.move_player(0, -1),
                    1 => game.move_player(0, 1),
                    2 => game.move_player(-1, 0),
                    3 => game.move_player(1, 0),
                    4 => game.rest(),
                    _ => {
                        game.look();
                        game.close_overlay();
                    }
                },
                GameState::Playing(PlayingState::Combat) => {
                    let action = if command == 0 { PlayerAction::Flee } else { PlayerAction::Attack };
                    game.combat_action(action).unwrap();
                }
                GameState::Playing(PlayingState::ExitPrompt) => game.confirm_exit(command % 2 == 0).unwrap(),
                GameState::Playing(PlayingState::Shop) => game.leave_shop(),
                GameState::Playing(_) => game.close_overlay(),
                _ => break,
            }

            let player = game.player().unwrap();
            prop_assert!(player.stats.hp >= 0 && player.stats.hp <= player.stats.max_hp);
            prop_assert!(player.energy >= 0 && player.energy <= player.max_energy);
            if game.is_playing() {
                prop_assert!(game.floor().unwrap().is_walkable(player.position));
                prop_assert!(player.stats.is_alive());
            }
        }
    }
}
