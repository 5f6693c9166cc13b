//! Game state machine
//!
//! Manages the overall game state and transitions between different modes.
//! Every player command goes through `Game`; enemies act only once a
//! command has consumed the player's turn.

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::ai::run_enemy_turns;
use super::shop::Shop;
use crate::combat::{Arena, CombatOutcome, CombatReport, Encounter, PlayerAction};
use crate::data::{DataManager, GameConfig};
use crate::entities::{spawn_enemy, ClassType, Enemy, EnemyId, ItemChoice, Player};
use crate::error::{ActionError, GenerationError};
use crate::items::Catalog;
use crate::save::{self, SaveData, SaveError};
use crate::world::{Floor, FloorGenerator, FloorRequest, Position};

/// Name used when character creation is left blank
pub const DEFAULT_PLAYER_NAME: &str = "Explorer";

/// Messages kept in the log
const MAX_MESSAGES: usize = 100;

/// The main game struct that holds all game data
pub struct Game {
    /// Current game state
    state: GameState,
    player: Option<Player>,
    /// Current dungeon floor
    floor: Option<Floor>,
    /// Fight in progress, if any
    encounter: Option<Encounter>,
    /// Stock of the shop the player is standing in
    shop: Option<Shop>,
    /// Current floor number, starting at 0
    floor_index: u32,
    /// Random number generator (seeded for reproducibility)
    rng: StdRng,
    /// Message log
    messages: Vec<GameMessage>,
    /// Exploration turns taken this run
    turn: u32,
    /// External game data (items, skills, enemies, config)
    data: DataManager,
    /// Where the run is saved
    save_path: PathBuf,
}

/// All possible game states
#[derive(Debug, Clone, PartialEq)]
pub enum GameState {
    /// Main menu screen
    MainMenu,
    /// Choosing a name and class
    CharacterCreation,
    /// Actively playing
    Playing(PlayingState),
    /// Player died
    GameOver {
        floor_reached: u32,
        cause_of_death: String,
    },
    /// Crystal quota reached
    Victory,
    /// Exit the game
    Quit,
}

/// Sub-states while playing
#[derive(Debug, Clone, PartialEq)]
pub enum PlayingState {
    /// Moving around the floor
    Exploring,
    /// Turn-based combat
    Combat,
    /// Viewing inventory, from the floor or mid-fight
    Inventory { in_combat: bool },
    /// Picking a skill in combat
    Skills,
    /// Viewing character sheet
    Character,
    /// Inspecting the nearest enemy
    LookAround,
    /// Browsing the shop
    Shop,
    /// Standing on the exit, asked whether to descend
    ExitPrompt,
    /// Asked whether to save before quitting
    QuitPrompt,
}

/// A message to display in the game log
#[derive(Debug, Clone)]
pub struct GameMessage {
    pub text: String,
    pub turn: u32,
    pub category: MessageCategory,
}

/// Categories for message filtering/coloring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageCategory {
    Combat,
    Item,
    System,
    Lore,
    Warning,
}

/// What the player learns about the nearest enemy
#[derive(Debug, Clone, PartialEq)]
pub struct LookReport {
    pub name: String,
    pub symbol: char,
    pub hp: i32,
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    pub strength: &'static str,
    pub distance: f64,
}

impl Game {
    /// Create a new game instance with data from disk and an entropy seed
    pub fn new() -> Self {
        Self::with_data(DataManager::new(), None, save::save_path())
    }

    /// Create a game from explicit data. A seed makes the run reproducible.
    pub fn with_data(data: DataManager, seed: Option<u64>, save_path: PathBuf) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            state: GameState::MainMenu,
            player: None,
            floor: None,
            encounter: None,
            shop: None,
            floor_index: 0,
            rng,
            messages: Vec::new(),
            turn: 0,
            data,
            save_path,
        }
    }

    /// Get access to the game data manager
    pub fn data(&self) -> &DataManager {
        &self.data
    }

    pub fn config(&self) -> &GameConfig {
        &self.data.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.data.catalog
    }

    /// Get the current game state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Set a new game state
    pub fn set_state(&mut self, state: GameState) {
        log::debug!("State transition: {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    /// Get the current floor
    pub fn floor(&self) -> Option<&Floor> {
        self.floor.as_ref()
    }

    /// Get the current floor number
    pub fn floor_index(&self) -> u32 {
        self.floor_index
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn encounter(&self) -> Option<&Encounter> {
        self.encounter.as_ref()
    }

    /// The enemy currently being fought
    pub fn combat_enemy(&self) -> Option<&Enemy> {
        let floor = self.floor.as_ref()?;
        self.encounter.as_ref()?.enemy(floor)
    }

    pub fn shop(&self) -> Option<&Shop> {
        self.shop.as_ref()
    }

    pub fn save_path(&self) -> &PathBuf {
        &self.save_path
    }

    /// Whether there is a save to continue from
    pub fn has_save(&self) -> bool {
        save::save_exists(&self.save_path)
    }

    /// Get mutable RNG
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Get all messages
    pub fn messages(&self) -> &[GameMessage] {
        &self.messages
    }

    /// Add a message to the log
    pub fn add_message(&mut self, text: impl Into<String>, category: MessageCategory) {
        self.messages.push(GameMessage {
            text: text.into(),
            turn: self.turn,
            category,
        });

        // Keep only last 100 messages
        if self.messages.len() > MAX_MESSAGES {
            self.messages.remove(0);
        }
    }

    /// True while a run is in progress
    pub fn is_playing(&self) -> bool {
        matches!(self.state, GameState::Playing(_))
    }

    // ------------------------------------------------------------------
    // Run setup
    // ------------------------------------------------------------------

    /// Create a character and generate the first floor
    pub fn start_new_run(&mut self, name: &str, class_type: ClassType) -> Result<(), GenerationError> {
        let name = match name.trim() {
            "" => DEFAULT_PLAYER_NAME,
            trimmed => trimmed,
        };
        let player = Player::new(name, class_type).with_starting_gear(&self.data.catalog);
        log::info!("New run: {} the {}", player.name, class_type.name());

        self.player = Some(player);
        self.turn = 0;
        self.encounter = None;
        self.shop = None;
        self.messages.clear();

        self.add_message(
            format!("You must collect {} Energy Crystals to reignite our dying world.", self.data.config.crystals_to_win),
            MessageCategory::Lore,
        );
        self.enter_floor(0, true)?;
        self.set_state(GameState::Playing(PlayingState::Exploring));
        Ok(())
    }

    /// Resume from the save file. Any failure is reported in the log and
    /// sends the player to character creation instead.
    pub fn continue_saved_game(&mut self) -> bool {
        let save = match save::load_game(&self.save_path) {
            Ok(save) => save,
            Err(e) => {
                log::warn!("Could not load save: {}", e);
                self.add_message(format!("Error loading game: {}. Starting a new game.", e), MessageCategory::Warning);
                self.set_state(GameState::CharacterCreation);
                return false;
            }
        };

        let restored = save.restore(&self.data.catalog);
        self.player = Some(restored.player);
        self.turn = 0;
        self.encounter = None;
        self.shop = None;
        self.messages.clear();
        for warning in restored.warnings {
            self.add_message(warning, MessageCategory::Warning);
        }

        if let Err(e) = self.enter_floor(restored.floor_index, false) {
            self.add_message(format!("Could not rebuild the floor: {}", e), MessageCategory::Warning);
            self.player = None;
            self.set_state(GameState::CharacterCreation);
            return false;
        }

        self.add_message("Game loaded successfully!", MessageCategory::System);
        self.add_message(format!("Resuming Level {}...", self.floor_index), MessageCategory::System);
        self.set_state(GameState::Playing(PlayingState::Exploring));
        true
    }

    /// Generate and enter floor `floor_index`. A fresh arrival stands on
    /// the start tile; a loaded player keeps their position when it is
    /// still a free floor tile. On failure the current floor stays as is.
    fn enter_floor(&mut self, floor_index: u32, to_start: bool) -> Result<(), GenerationError> {
        let level = self.player.as_ref().map_or(1, |p| p.stats.level);
        let request = FloorRequest::for_floor(&self.data.config, level, floor_index);
        let generator = FloorGenerator::new(&self.data.config, &self.data.catalog, &self.data.enemies.templates);
        let floor = generator.generate(&mut self.rng, &request)?;

        if let Some(player) = self.player.as_mut() {
            let keep = !to_start && floor.is_walkable(player.position) && floor.enemy_at(player.position).is_none();
            if !keep {
                player.position = floor.player_start;
            }
        }
        log::info!("Entered floor {}", floor_index);
        self.floor = Some(floor);
        self.floor_index = floor_index;

        self.add_message(format!("--- Entering Level {} ---", self.floor_index), MessageCategory::System);
        self.add_message("The area is dark and foreboding...", MessageCategory::Lore);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Exploration
    // ------------------------------------------------------------------

    /// Step one tile. Bumping a wall still costs the turn.
    pub fn move_player(&mut self, dx: i32, dy: i32) {
        if self.state != GameState::Playing(PlayingState::Exploring) {
            return;
        }
        let (Some(player), Some(floor)) = (self.player.as_mut(), self.floor.as_mut()) else {
            return;
        };
        let target = player.position.offset(dx, dy);

        if !floor.is_walkable(target) {
            self.add_message("You hit a wall!", MessageCategory::System);
            self.finish_player_turn();
            return;
        }

        if let Some(outcome) = floor.trigger_trap(target, player) {
            let dead = !player.stats.is_alive();
            self.add_message(outcome.message(), MessageCategory::Warning);
            if dead {
                self.game_over("Killed by a hidden trap".to_string());
                return;
            }
        }

        if let Some((id, name)) = self.enemy_at(target) {
            self.add_message(format!("You bump into a {}! Combat begins!", name), MessageCategory::Combat);
            self.engage(id);
            return;
        }

        let (Some(player), Some(floor)) = (self.player.as_mut(), self.floor.as_mut()) else {
            return;
        };
        player.position = target;

        if let Some(item) = floor.take_item(target) {
            if item.is_collectible() {
                player.crystals_collected += 1;
                let count = player.crystals_collected;
                log::info!("Crystal {} collected on floor {}", count, self.floor_index);
                self.add_message(
                    format!(
                        "You found an {}! You now have {}/{} crystals.",
                        item.name, count, self.data.config.crystals_to_win
                    ),
                    MessageCategory::Item,
                );
            } else {
                let name = item.name.clone();
                player.inventory.add(item);
                self.add_message(format!("You found a {} and added it to your inventory!", name), MessageCategory::Item);
            }
        }

        let (on_shop, on_exit) = match self.floor.as_ref() {
            Some(floor) => (floor.shop_location == Some(target), floor.exit_location == target),
            None => (false, false),
        };

        if on_shop {
            self.add_message("You found a mysterious shop!", MessageCategory::System);
            self.shop = Some(Shop::generate(&mut self.rng, &self.data.catalog));
            self.set_state(GameState::Playing(PlayingState::Shop));
        } else if on_exit {
            self.add_message("You found the exit!", MessageCategory::System);
            self.set_state(GameState::Playing(PlayingState::ExitPrompt));
        } else {
            self.finish_player_turn();
        }
    }

    fn enemy_at(&self, pos: Position) -> Option<(EnemyId, String)> {
        self.floor.as_ref()?.enemy_at(pos).map(|e| (e.id, e.name.clone()))
    }

    /// Take a breather; may draw an ambush
    pub fn rest(&mut self) {
        if self.state != GameState::Playing(PlayingState::Exploring) {
            return;
        }
        let (rest_hp, rest_energy) = (self.data.config.rest_hp, self.data.config.rest_energy);
        let Some(player) = self.player.as_mut() else {
            return;
        };
        let (hp, energy) = player.rest(rest_hp, rest_energy);
        let (cur_hp, max_hp) = (player.stats.hp, player.stats.max_hp);
        let (cur_en, max_en) = (player.energy, player.max_energy);
        let level = player.stats.level;

        self.add_message("You find a quiet spot to rest...", MessageCategory::System);
        self.add_message(format!("You restored {} HP. Current HP: {}/{}", hp, cur_hp, max_hp), MessageCategory::System);
        self.add_message(
            format!("You restored {} Energy. Current Energy: {}/{}", energy, cur_en, max_en),
            MessageCategory::System,
        );

        let chance = self.data.config.rest_encounter_chance.clamp(0.0, 1.0);
        if !self.rng.gen_bool(chance) {
            self.add_message("You feel refreshed.", MessageCategory::System);
            self.finish_player_turn();
            return;
        }

        let ambusher = spawn_enemy(
            &mut self.rng,
            &self.data.enemies.templates,
            level,
            &self.data.catalog,
            self.data.config.enemy_drop_chance,
        );
        let Some(mut enemy) = ambusher else {
            self.finish_player_turn();
            return;
        };
        self.add_message("Suddenly, you hear movement nearby! An enemy ambushes you!", MessageCategory::Combat);

        let spot = match (self.floor.as_ref(), self.player.as_ref()) {
            (Some(floor), Some(player)) => floor.open_neighbours(player.position).choose(&mut self.rng).copied(),
            _ => None,
        };
        match (spot, self.floor.as_mut()) {
            (Some(pos), Some(floor)) => {
                enemy.position = pos;
                let id = floor.add_enemy(enemy);
                self.engage(id);
            }
            _ => {
                self.add_message("The enemy appears out of nowhere!", MessageCategory::Combat);
                self.ambush(enemy);
            }
        }
    }

    /// Describe the nearest living enemy
    pub fn look_around(&self) -> Option<LookReport> {
        let player = self.player.as_ref()?;
        let (enemy, distance) = self.floor.as_ref()?.nearest_enemy(player.position)?;
        Some(LookReport {
            name: enemy.name.clone(),
            symbol: enemy.symbol,
            hp: enemy.stats.hp,
            max_hp: enemy.stats.max_hp,
            attack: enemy.stats.attack,
            defense: enemy.stats.defense,
            speed: enemy.stats.speed,
            strength: enemy.strength_label(&player.stats),
            distance,
        })
    }

    /// Open the look overlay; free action
    pub fn look(&mut self) {
        if self.look_around().is_some() {
            self.set_state(GameState::Playing(PlayingState::LookAround));
        } else {
            self.add_message("No enemies detected nearby.", MessageCategory::System);
        }
    }

    /// Use or equip an item. In combat this is the player's combat step;
    /// outside it, a success ends the exploration turn.
    pub fn use_item(&mut self, choice: ItemChoice) -> Result<(), ActionError> {
        if self.encounter.is_some() {
            return self.combat_action(PlayerAction::UseItem(choice));
        }
        let player = self.player.as_mut().ok_or(ActionError::InvalidSelection)?;
        let used = player.use_item(choice)?;
        self.add_message(used.message(), MessageCategory::Item);
        self.set_state(GameState::Playing(PlayingState::Exploring));
        self.finish_player_turn();
        Ok(())
    }

    /// Leave an overlay without doing anything
    pub fn close_overlay(&mut self) {
        let next = if self.encounter.is_some() {
            PlayingState::Combat
        } else {
            PlayingState::Exploring
        };
        self.set_state(GameState::Playing(next));
    }

    /// Answer the descend prompt. Either way the turn ends.
    pub fn confirm_exit(&mut self, descend: bool) -> Result<(), GenerationError> {
        if self.state != GameState::Playing(PlayingState::ExitPrompt) {
            return Ok(());
        }
        self.set_state(GameState::Playing(PlayingState::Exploring));
        if descend {
            self.add_message("Proceeding to the next level...", MessageCategory::System);
            self.enter_floor(self.floor_index + 1, true)?;
        } else {
            self.add_message("You decide to continue exploring this level.", MessageCategory::System);
        }
        self.finish_player_turn();
        Ok(())
    }

    /// Victory check, then enemy turns, then the defeat check
    fn finish_player_turn(&mut self) {
        self.turn += 1;

        let quota = self.data.config.crystals_to_win;
        let crystals = self.player.as_ref().map_or(0, |p| p.crystals_collected);
        if crystals >= quota {
            self.victory();
            return;
        }

        let (Some(player), Some(floor)) = (self.player.as_mut(), self.floor.as_mut()) else {
            return;
        };
        let messages = run_enemy_turns(floor, player);
        let dead = !player.stats.is_alive();
        for message in messages {
            self.add_message(message, MessageCategory::Combat);
        }
        if dead {
            self.add_message("You have fallen in battle. Game Over!", MessageCategory::Combat);
            self.game_over("Fell in battle".to_string());
        }
    }

    fn victory(&mut self) {
        let name = self.player.as_ref().map_or_else(String::new, |p| p.name.clone());
        log::info!("{} won on floor {}", name, self.floor_index);
        self.add_message(format!("*** Congratulations, {}! ***", name), MessageCategory::Lore);
        self.add_message(
            format!(
                "You have collected {} Energy Crystals and completed your mission!",
                self.data.config.crystals_to_win
            ),
            MessageCategory::Lore,
        );
        self.add_message("The galaxy is safe, for now...", MessageCategory::Lore);
        self.set_state(GameState::Victory);
    }

    fn game_over(&mut self, cause_of_death: String) {
        log::info!("Run ended on floor {}: {}", self.floor_index, cause_of_death);
        self.encounter = None;
        self.set_state(GameState::GameOver {
            floor_reached: self.floor_index,
            cause_of_death,
        });
    }

    // ------------------------------------------------------------------
    // Combat
    // ------------------------------------------------------------------

    fn engage(&mut self, id: EnemyId) {
        let (Some(player), Some(floor)) = (self.player.as_mut(), self.floor.as_mut()) else {
            return;
        };
        let mut arena = Arena { player, floor, catalog: &self.data.catalog };
        let (encounter, report) = Encounter::engage(id, &mut arena);
        self.begin_encounter(encounter, report);
    }

    fn ambush(&mut self, enemy: Enemy) {
        let (Some(player), Some(floor)) = (self.player.as_mut(), self.floor.as_mut()) else {
            return;
        };
        let mut arena = Arena { player, floor, catalog: &self.data.catalog };
        let (encounter, report) = Encounter::ambush(enemy, &mut arena);
        self.begin_encounter(encounter, report);
    }

    fn begin_encounter(&mut self, encounter: Encounter, report: CombatReport) {
        let foe = self.floor.as_ref().and_then(|f| encounter.enemy(f)).map(|e| e.name.clone());
        self.encounter = Some(encounter);
        self.set_state(GameState::Playing(PlayingState::Combat));
        self.absorb_report(report, foe);
    }

    /// Take a combat step. Errors are blocked actions and keep the turn.
    pub fn combat_action(&mut self, action: PlayerAction) -> Result<(), ActionError> {
        let (Some(player), Some(floor), Some(encounter)) =
            (self.player.as_mut(), self.floor.as_mut(), self.encounter.as_mut())
        else {
            return Err(ActionError::CombatOver);
        };
        let foe = encounter.enemy(floor).map(|e| e.name.clone());
        let mut arena = Arena { player, floor, catalog: &self.data.catalog };
        let report = encounter.act(action, &mut arena, &mut self.rng)?;

        self.set_state(GameState::Playing(PlayingState::Combat));
        self.absorb_report(report, foe);
        Ok(())
    }

    /// Log a combat report and leave combat if it ended
    fn absorb_report(&mut self, report: CombatReport, foe: Option<String>) {
        for message in report.messages {
            self.add_message(message, MessageCategory::Combat);
        }
        let Some(outcome) = report.outcome else {
            return;
        };

        self.encounter = None;
        match outcome {
            CombatOutcome::PlayerDefeated => {
                let cause = match foe {
                    Some(name) => format!("Defeated by a {}", name),
                    None => "Defeated in combat".to_string(),
                };
                self.game_over(cause);
            }
            CombatOutcome::EnemyDefeated | CombatOutcome::Fled => {
                self.set_state(GameState::Playing(PlayingState::Exploring));
                self.finish_player_turn();
            }
        }
    }

    // ------------------------------------------------------------------
    // Shop
    // ------------------------------------------------------------------

    pub fn shop_buy(&mut self, index: usize) -> Result<(), ActionError> {
        let (Some(shop), Some(player)) = (self.shop.as_mut(), self.player.as_mut()) else {
            return Err(ActionError::InvalidSelection);
        };
        let trade = shop.buy(index, player)?;
        self.add_message(trade.bought_message(), MessageCategory::Item);
        Ok(())
    }

    pub fn shop_sell(&mut self, choice: ItemChoice) -> Result<(), ActionError> {
        let (Some(shop), Some(player)) = (self.shop.as_mut(), self.player.as_mut()) else {
            return Err(ActionError::InvalidSelection);
        };
        let trade = shop.sell(choice, player)?;
        self.add_message(trade.sold_message(), MessageCategory::Item);
        Ok(())
    }

    /// Walk out of the shop, ending the turn
    pub fn leave_shop(&mut self) {
        if self.state != GameState::Playing(PlayingState::Shop) {
            return;
        }
        self.shop = None;
        self.add_message("Thank you for your business! Farewell.", MessageCategory::System);
        self.set_state(GameState::Playing(PlayingState::Exploring));
        self.finish_player_turn();
    }

    // ------------------------------------------------------------------
    // Saving and quitting
    // ------------------------------------------------------------------

    /// Write the current run to the save file
    pub fn save(&mut self) -> Result<(), SaveError> {
        let Some(player) = self.player.as_ref() else {
            self.add_message("No game in progress to save.", MessageCategory::Warning);
            return Ok(());
        };
        let data = SaveData::capture(player, self.floor_index);
        match save::save_game(&data, &self.save_path) {
            Ok(()) => {
                self.add_message("Game saved successfully!", MessageCategory::System);
                Ok(())
            }
            Err(e) => {
                log::error!("Save failed: {}", e);
                self.add_message(format!("Error saving game: {}", e), MessageCategory::Warning);
                Err(e)
            }
        }
    }

    pub fn request_quit(&mut self) {
        if self.state == GameState::Playing(PlayingState::Exploring) {
            self.set_state(GameState::Playing(PlayingState::QuitPrompt));
        }
    }

    /// Answer the quit prompt. A failed save keeps the game open.
    pub fn confirm_quit(&mut self, save_first: bool) -> Result<(), SaveError> {
        if save_first {
            self.save()?;
        }
        log::info!("Quitting");
        self.set_state(GameState::Quit);
        Ok(())
    }

    pub fn cancel_quit(&mut self) {
        if self.state == GameState::Playing(PlayingState::QuitPrompt) {
            self.set_state(GameState::Playing(PlayingState::Exploring));
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
