//! Main UI Application
//!
//! Coordinates rendering and input handling across all screens.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::combat::PlayerAction;
use crate::entities::{ClassType, ItemChoice, Player};
use crate::error::ActionError;
use crate::game::{Game, GameState, MessageCategory, PlayingState};
use crate::items::{EquipSlot, Item};
use crate::save;
use crate::world::Position;

/// Longest name accepted at character creation
const MAX_NAME_LEN: usize = 20;

/// Truncate a string to fit within max_len characters, adding "…" if truncated
fn truncate_name(name: &str, max_len: usize) -> String {
    if name.chars().count() <= max_len {
        name.to_string()
    } else if max_len <= 1 {
        "…".to_string()
    } else {
        let truncated: String = name.chars().take(max_len - 1).collect();
        format!("{}…", truncated)
    }
}

/// One selectable line of the inventory: equipped gear first, then the bag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InventoryRow<'a> {
    pub choice: ItemChoice,
    pub item: &'a Item,
    pub equipped: bool,
}

/// List what the player carries in display order
pub fn inventory_rows(player: &Player) -> Vec<InventoryRow<'_>> {
    let mut rows = Vec::new();
    for slot in [EquipSlot::Weapon, EquipSlot::Armor] {
        if let Some(item) = player.equipment.get(slot) {
            rows.push(InventoryRow {
                choice: ItemChoice::Equipped(slot),
                item,
                equipped: true,
            });
        }
    }
    for (index, item) in player.inventory.items().iter().enumerate() {
        rows.push(InventoryRow {
            choice: ItemChoice::Bag(index),
            item,
            equipped: false,
        });
    }
    rows
}

/// Which step of character creation is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CreationStep {
    Name,
    Class,
}

/// Shop tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShopMode {
    Buy,
    Sell,
}

/// Main UI application
pub struct App {
    /// Name typed so far at character creation
    creation_name: String,
    creation_step: CreationStep,
    /// Index into ClassType::ALL
    class_cursor: usize,
    /// Current inventory cursor position
    inventory_cursor: usize,
    /// Cursor in the combat skill list
    skill_cursor: usize,
    /// Shop mode: buy or sell
    shop_mode: ShopMode,
    /// Shop selection cursor
    shop_selection: usize,
    /// Sell selection cursor (index into inventory rows)
    sell_selection: usize,
}

impl App {
    pub fn new() -> Self {
        Self {
            creation_name: String::new(),
            creation_step: CreationStep::Name,
            class_cursor: 0,
            inventory_cursor: 0,
            skill_cursor: 0,
            shop_mode: ShopMode::Buy,
            shop_selection: 0,
            sell_selection: 0,
        }
    }

    /// Handle keyboard input, returns true if should quit
    pub fn handle_input(&mut self, key: KeyEvent, game: &mut Game) -> Result<bool> {
        // Global quit shortcut
        if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(true);
        }

        match game.state().clone() {
            GameState::MainMenu => self.handle_main_menu_input(key, game),
            GameState::CharacterCreation => self.handle_creation_input(key, game),
            GameState::Playing(playing_state) => self.handle_playing_input(key, game, playing_state),
            GameState::GameOver { .. } | GameState::Victory => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                    game.set_state(GameState::MainMenu);
                }
                Ok(false)
            }
            GameState::Quit => Ok(true),
        }
    }

    fn handle_main_menu_input(&mut self, key: KeyEvent, game: &mut Game) -> Result<bool> {
        match key.code {
            KeyCode::Enter | KeyCode::Char('n') => {
                self.creation_name.clear();
                self.creation_step = CreationStep::Name;
                self.class_cursor = 0;
                game.set_state(GameState::CharacterCreation);
            }
            KeyCode::Char('c') if game.has_save() => {
                game.continue_saved_game();
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                game.set_state(GameState::Quit);
                return Ok(true);
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_creation_input(&mut self, key: KeyEvent, game: &mut Game) -> Result<bool> {
        match self.creation_step {
            CreationStep::Name => match key.code {
                KeyCode::Char(c) if !c.is_control() && self.creation_name.chars().count() < MAX_NAME_LEN => {
                    self.creation_name.push(c);
                }
                KeyCode::Backspace => {
                    self.creation_name.pop();
                }
                KeyCode::Enter => self.creation_step = CreationStep::Class,
                KeyCode::Esc => game.set_state(GameState::MainMenu),
                _ => {}
            },
            CreationStep::Class => match key.code {
                KeyCode::Up | KeyCode::Char('w') => {
                    self.class_cursor = self.class_cursor.saturating_sub(1);
                }
                KeyCode::Down | KeyCode::Char('s') => {
                    self.class_cursor = (self.class_cursor + 1).min(ClassType::ALL.len() - 1);
                }
                KeyCode::Char(c @ '1'..='3') => {
                    self.class_cursor = c as usize - '1' as usize;
                }
                KeyCode::Enter => {
                    let class = ClassType::ALL[self.class_cursor.min(ClassType::ALL.len() - 1)];
                    game.start_new_run(&self.creation_name, class)?;
                }
                KeyCode::Esc => self.creation_step = CreationStep::Name,
                _ => {}
            },
        }
        Ok(false)
    }

    fn handle_playing_input(&mut self, key: KeyEvent, game: &mut Game, state: PlayingState) -> Result<bool> {
        match state {
            PlayingState::Exploring => self.handle_exploring_input(key, game),
            PlayingState::Combat => self.handle_combat_input(key, game),
            PlayingState::Inventory { .. } => self.handle_inventory_input(key, game),
            PlayingState::Skills => self.handle_skills_input(key, game),
            PlayingState::Character | PlayingState::LookAround => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('c') | KeyCode::Char('l')) {
                    game.close_overlay();
                }
                Ok(false)
            }
            PlayingState::Shop => self.handle_shop_input(key, game),
            PlayingState::ExitPrompt => {
                let answer = match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => Some(true),
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(false),
                    _ => None,
                };
                if let Some(descend) = answer {
                    if let Err(e) = game.confirm_exit(descend) {
                        game.add_message(format!("The way down collapsed: {}", e), MessageCategory::Warning);
                        return Err(e.into());
                    }
                }
                Ok(false)
            }
            PlayingState::QuitPrompt => self.handle_quit_prompt_input(key, game),
        }
    }

    fn handle_exploring_input(&mut self, key: KeyEvent, game: &mut Game) -> Result<bool> {
        match key.code {
            KeyCode::Up | KeyCode::Char('w') => game.move_player(0, -1),
            KeyCode::Down | KeyCode::Char('s') => game.move_player(0, 1),
            KeyCode::Left | KeyCode::Char('a') => game.move_player(-1, 0),
            KeyCode::Right | KeyCode::Char('d') => game.move_player(1, 0),
            KeyCode::Char('i') => {
                self.inventory_cursor = 0;
                game.set_state(GameState::Playing(PlayingState::Inventory { in_combat: false }));
            }
            KeyCode::Char('c') => game.set_state(GameState::Playing(PlayingState::Character)),
            KeyCode::Char('r') => game.rest(),
            KeyCode::Char('l') => game.look(),
            KeyCode::Char('q') | KeyCode::Esc => game.request_quit(),
            _ => {}
        }
        Ok(false)
    }

    fn handle_combat_input(&mut self, key: KeyEvent, game: &mut Game) -> Result<bool> {
        match key.code {
            KeyCode::Char('a') => self.combat_step(game, PlayerAction::Attack),
            KeyCode::Char('f') => self.combat_step(game, PlayerAction::Flee),
            KeyCode::Char('i') => {
                self.inventory_cursor = 0;
                game.set_state(GameState::Playing(PlayingState::Inventory { in_combat: true }));
            }
            KeyCode::Char('k') => {
                let has_skills = game.player().is_some_and(|p| !p.learned_skills.is_empty());
                if has_skills {
                    self.skill_cursor = 0;
                    game.set_state(GameState::Playing(PlayingState::Skills));
                } else {
                    report_blocked(game, ActionError::NoSkills);
                }
            }
            _ => {}
        }
        Ok(false)
    }

    fn combat_step(&mut self, game: &mut Game, action: PlayerAction) {
        if let Err(e) = game.combat_action(action) {
            report_blocked(game, e);
        }
    }

    fn handle_inventory_input(&mut self, key: KeyEvent, game: &mut Game) -> Result<bool> {
        let count = game.player().map_or(0, |p| inventory_rows(p).len());
        match key.code {
            KeyCode::Up | KeyCode::Char('w') => {
                self.inventory_cursor = self.inventory_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('s') => {
                if self.inventory_cursor + 1 < count {
                    self.inventory_cursor += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char('e') => {
                let choice = game
                    .player()
                    .and_then(|p| inventory_rows(p).get(self.inventory_cursor).map(|row| row.choice));
                let result = match choice {
                    Some(choice) => game.use_item(choice),
                    None => Err(ActionError::InvalidSelection),
                };
                if let Err(e) = result {
                    report_blocked(game, e);
                }
                self.inventory_cursor = self.inventory_cursor.min(count.saturating_sub(2));
            }
            KeyCode::Esc | KeyCode::Char('i') => game.close_overlay(),
            _ => {}
        }
        Ok(false)
    }

    fn handle_skills_input(&mut self, key: KeyEvent, game: &mut Game) -> Result<bool> {
        let count = game.player().map_or(0, |p| p.learned_skills.len());
        match key.code {
            KeyCode::Up | KeyCode::Char('w') => {
                self.skill_cursor = self.skill_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('s') => {
                if self.skill_cursor + 1 < count {
                    self.skill_cursor += 1;
                }
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                self.combat_step(game, PlayerAction::UseSkill(index));
            }
            KeyCode::Enter => self.combat_step(game, PlayerAction::UseSkill(self.skill_cursor)),
            KeyCode::Esc | KeyCode::Char('k') => game.close_overlay(),
            _ => {}
        }
        Ok(false)
    }

    fn handle_shop_input(&mut self, key: KeyEvent, game: &mut Game) -> Result<bool> {
        let (stock, rows) = match (game.shop(), game.player()) {
            (Some(shop), Some(player)) => (shop.stock().len(), inventory_rows(player).len()),
            _ => (0, 0),
        };
        let (cursor, count) = match self.shop_mode {
            ShopMode::Buy => (&mut self.shop_selection, stock),
            ShopMode::Sell => (&mut self.sell_selection, rows),
        };

        match key.code {
            KeyCode::Tab | KeyCode::Char('b') | KeyCode::Char('v') => {
                self.shop_mode = match self.shop_mode {
                    ShopMode::Buy => ShopMode::Sell,
                    ShopMode::Sell => ShopMode::Buy,
                };
            }
            KeyCode::Up | KeyCode::Char('w') => *cursor = cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('s') => {
                if *cursor + 1 < count {
                    *cursor += 1;
                }
            }
            KeyCode::Enter => {
                let index = *cursor;
                *cursor = index.min(count.saturating_sub(2));
                let result = match self.shop_mode {
                    ShopMode::Buy => game.shop_buy(index),
                    ShopMode::Sell => {
                        let choice = game
                            .player()
                            .and_then(|p| inventory_rows(p).get(index).map(|row| row.choice));
                        match choice {
                            Some(choice) => game.shop_sell(choice),
                            None => Err(ActionError::InvalidSelection),
                        }
                    }
                };
                if let Err(e) = result {
                    report_blocked(game, e);
                }
            }
            KeyCode::Esc | KeyCode::Char('q') => {
                self.shop_mode = ShopMode::Buy;
                self.shop_selection = 0;
                self.sell_selection = 0;
                game.leave_shop();
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_quit_prompt_input(&mut self, key: KeyEvent, game: &mut Game) -> Result<bool> {
        let save_first = match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => true,
            KeyCode::Char('n') | KeyCode::Char('N') => false,
            KeyCode::Esc => {
                game.cancel_quit();
                return Ok(false);
            }
            _ => return Ok(false),
        };
        match game.confirm_quit(save_first) {
            Ok(()) => {
                game.add_message("Exiting game. Goodbye!", MessageCategory::System);
                Ok(true)
            }
            // The failure is already in the log; stay on the prompt
            Err(e) => {
                log::warn!("Quit aborted: {}", e);
                Ok(false)
            }
        }
    }

    /// Render the current game state
    pub fn render(&self, frame: &mut Frame, game: &Game) {
        // Clear the entire screen first to prevent artifacts
        frame.render_widget(Clear, frame.area());

        match game.state() {
            GameState::MainMenu => self.render_main_menu(frame, game),
            GameState::CharacterCreation => self.render_creation(frame, game),
            GameState::Playing(state) => self.render_playing(frame, game, state),
            GameState::GameOver { floor_reached, cause_of_death } => {
                self.render_game_over(frame, *floor_reached, cause_of_death);
            }
            GameState::Victory => self.render_victory(frame, game),
            GameState::Quit => {}
        }
    }

    fn render_main_menu(&self, frame: &mut Frame, game: &Game) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Percentage(40),
                Constraint::Percentage(30),
            ])
            .split(area);

        let title = vec![
            Line::from(Span::styled(
                "E C H O E S   O F   X Y L O S",
                Style::default().fg(Color::Rgb(0, 200, 220)).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Gather the Energy Crystals. Reignite the world.",
                Style::default().fg(Color::Rgb(100, 100, 100)),
            )),
        ];
        let title_para = Paragraph::new(title).alignment(Alignment::Center);
        frame.render_widget(title_para, chunks[0]);

        let mut menu = vec![
            Line::from(""),
            Line::from(Span::styled(
                "[N] New Game",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        if game.has_save() {
            menu.push(Line::from(Span::styled("[C] Continue", Style::default().fg(Color::White))));
            if let Ok(summary) = save::load_save_summary(game.save_path()) {
                menu.push(Line::from(Span::styled(
                    summary.to_string(),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        } else {
            menu.push(Line::from(Span::styled("[C] Continue", Style::default().fg(Color::DarkGray))));
        }
        menu.push(Line::from(""));
        menu.push(Line::from(Span::styled("[Q] Quit", Style::default().fg(Color::Gray))));

        let menu_para = Paragraph::new(menu).alignment(Alignment::Center);
        frame.render_widget(menu_para, chunks[1]);

        // Last warning, e.g. a failed load
        let notice = game
            .messages()
            .last()
            .filter(|m| m.category == MessageCategory::Warning)
            .map_or_else(String::new, |m| m.text.clone());
        let footer = Paragraph::new(vec![
            Line::from(Span::styled(notice, Style::default().fg(Color::LightRed))),
            Line::from(Span::styled(
                format!("v{}", env!("CARGO_PKG_VERSION")),
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(footer, chunks[2]);
    }

    fn render_creation(&self, frame: &mut Frame, game: &Game) {
        let area = centered_rect(60, 60, frame.area());
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" New Explorer ")
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = vec![Line::from("")];
        if let Some(message) = game.messages().last().filter(|m| m.category == MessageCategory::Warning) {
            lines.push(Line::from(Span::styled(message.text.clone(), Style::default().fg(Color::LightRed))));
            lines.push(Line::from(""));
        }

        let name_style = match self.creation_step {
            CreationStep::Name => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            CreationStep::Class => Style::default().fg(Color::White),
        };
        let shown_name = if self.creation_name.is_empty() && self.creation_step == CreationStep::Class {
            crate::game::DEFAULT_PLAYER_NAME.to_string()
        } else {
            self.creation_name.clone()
        };
        lines.push(Line::from(vec![
            Span::raw("Name: "),
            Span::styled(shown_name, name_style),
            Span::styled(
                if self.creation_step == CreationStep::Name { "_" } else { "" },
                Style::default().fg(Color::Yellow),
            ),
        ]));
        lines.push(Line::from(""));

        if self.creation_step == CreationStep::Class {
            lines.push(Line::from("Choose your class:"));
            lines.push(Line::from(""));
            for (i, class) in ClassType::ALL.iter().enumerate() {
                let selected = i == self.class_cursor;
                let style = if selected {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                lines.push(Line::from(vec![
                    Span::styled(if selected { "► " } else { "  " }, style),
                    Span::styled(format!("{}. {:<9}", i + 1, class.name()), style),
                    Span::styled(format!(" {}", class.description()), Style::default().fg(Color::Gray)),
                ]));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "[↑↓] Select  [Enter] Begin  [Esc] Back",
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Type a name, [Enter] to continue, [Esc] for the menu",
                Style::default().fg(Color::DarkGray),
            )));
        }

        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
    }

    fn render_playing(&self, frame: &mut Frame, game: &Game, state: &PlayingState) {
        let area = frame.area();

        // Main layout: sidebar on right
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(40), Constraint::Length(28)])
            .split(area);

        // Map area with message log at bottom
        let left_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(10), Constraint::Length(7)])
            .split(chunks[0]);

        self.render_map(frame, game, left_chunks[0]);
        self.render_messages(frame, game, left_chunks[1]);
        self.render_sidebar(frame, game, chunks[1]);

        // Render overlay for special states
        match state {
            PlayingState::Exploring => {}
            PlayingState::Combat => self.render_combat_panel(frame, game, left_chunks[0]),
            PlayingState::Inventory { in_combat } => {
                if *in_combat {
                    self.render_combat_panel(frame, game, left_chunks[0]);
                }
                self.render_inventory_overlay(frame, game);
            }
            PlayingState::Skills => {
                self.render_combat_panel(frame, game, left_chunks[0]);
                self.render_skills_overlay(frame, game);
            }
            PlayingState::Character => self.render_character_overlay(frame, game),
            PlayingState::LookAround => self.render_look_overlay(frame, game),
            PlayingState::Shop => self.render_shop_overlay(frame, game),
            PlayingState::ExitPrompt => {
                render_prompt(frame, " Exit ", &["Proceed to the next level? (y/n)"]);
            }
            PlayingState::QuitPrompt => {
                render_prompt(frame, " Quit ", &["Save before quitting? (y/n)", "[Esc] Keep playing"]);
            }
        }
    }

    fn render_map(&self, frame: &mut Frame, game: &Game, area: Rect) {
        let (Some(floor), Some(player)) = (game.floor(), game.player()) else {
            return;
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Level {} ", game.floor_index()))
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        // Keep the player centered when the floor is larger than the view
        let view_w = i32::from(inner.width);
        let view_h = i32::from(inner.height);
        let cam_x = (player.position.x - view_w / 2).clamp(0, (floor.width - view_w).max(0));
        let cam_y = (player.position.y - view_h / 2).clamp(0, (floor.height - view_h).max(0));

        let lines: Vec<Line> = (cam_y..(cam_y + view_h).min(floor.height))
            .map(|y| {
                let spans: Vec<Span> = (cam_x..(cam_x + view_w).min(floor.width))
                    .map(|x| {
                        let cell = floor.cell_at(Position::new(x, y), player.position);
                        let (r, g, b) = cell.fg_color();
                        Span::styled(cell.glyph().to_string(), Style::default().fg(Color::Rgb(r, g, b)))
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_messages(&self, frame: &mut Frame, game: &Game, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Messages ")
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(area);

        let messages: Vec<Line> = game
            .messages()
            .iter()
            .rev()
            .take(inner.height as usize)
            .rev()
            .map(|msg| {
                let color = match msg.category {
                    MessageCategory::Combat => Color::Red,
                    MessageCategory::Item => Color::Yellow,
                    MessageCategory::System => Color::Cyan,
                    MessageCategory::Lore => Color::Magenta,
                    MessageCategory::Warning => Color::LightRed,
                };
                Line::from(Span::styled(msg.text.as_str(), Style::default().fg(color)))
            })
            .collect();

        let para = Paragraph::new(messages).block(block);
        frame.render_widget(para, area);
    }

    fn render_sidebar(&self, frame: &mut Frame, game: &Game, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Status ")
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(player) = game.player() else {
            return;
        };
        let stats = &player.stats;
        let label = Style::default().fg(Color::Gray);

        let mut lines = vec![
            Line::from(Span::styled(
                truncate_name(&player.name, inner.width as usize),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("Level {} {}", stats.level, player.class_type.name()),
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("HP:  ", label),
                Span::styled(
                    format!("{}/{}", stats.hp, stats.max_hp),
                    Style::default().fg(hp_color(stats.hp, stats.max_hp)),
                ),
            ]),
            Line::from(vec![
                Span::styled("EN:  ", label),
                Span::styled(
                    format!("{}/{}", player.energy, player.max_energy),
                    Style::default().fg(Color::Blue),
                ),
            ]),
            Line::from(vec![
                Span::styled("XP:  ", label),
                Span::raw(format!("{}/{}", player.xp, player.xp_to_next_level)),
            ]),
            Line::from(""),
            Line::from(format!("ATK {}  DEF {}  SPD {}", stats.attack, stats.defense, stats.speed)),
            Line::from(""),
            Line::from(vec![
                Span::styled("Credits:  ", label),
                Span::styled(player.credits.to_string(), Style::default().fg(Color::Yellow)),
            ]),
            Line::from(vec![
                Span::styled("Crystals: ", label),
                Span::styled(
                    format!("{}/{}", player.crystals_collected, game.config().crystals_to_win),
                    Style::default().fg(Color::Magenta),
                ),
            ]),
            Line::from(vec![
                Span::styled("Floor:    ", label),
                Span::raw(game.floor_index().to_string()),
            ]),
            Line::from(""),
        ];

        let width = (inner.width as usize).saturating_sub(4);
        for (tag, slot) in [("W: ", EquipSlot::Weapon), ("A: ", EquipSlot::Armor)] {
            let name = player
                .equipment
                .get(slot)
                .map_or_else(|| "-".to_string(), |item| truncate_name(&item.name, width));
            lines.push(Line::from(vec![Span::styled(tag, label), Span::raw(name)]));
        }

        lines.push(Line::from(""));
        for hint in ["[WASD] Move  [R] Rest", "[I] Items  [C] Stats", "[L] Look  [Q] Quit"] {
            lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))));
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_combat_panel(&self, frame: &mut Frame, game: &Game, map_area: Rect) {
        let (Some(enemy), Some(player)) = (game.combat_enemy(), game.player()) else {
            return;
        };
        let area = centered_rect(70, 60, map_area);
        frame.render_widget(Clear, area);

        let round = game.encounter().map_or(0, |e| e.round());
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Combat - Round {} ", round))
            .border_style(Style::default().fg(Color::Red));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines = vec![
            Line::from(Span::styled(
                format!("{} ({})", enemy.name, enemy.symbol),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("HP {}/{}", enemy.stats.hp, enemy.stats.max_hp),
                Style::default().fg(hp_color(enemy.stats.hp, enemy.stats.max_hp)),
            )),
            Line::from(format!(
                "ATK {}  DEF {}  SPD {}",
                enemy.stats.attack, enemy.stats.defense, enemy.stats.speed
            )),
            Line::from(""),
            Line::from(Span::styled(
                player.name.as_str(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(format!(
                "HP {}/{}  EN {}/{}",
                player.stats.hp, player.stats.max_hp, player.energy, player.max_energy
            )),
            Line::from(""),
            Line::from(Span::styled(
                if player.learned_skills.is_empty() {
                    "[A] Attack  [I] Items  [F] Flee"
                } else {
                    "[A] Attack  [I] Items  [F] Flee  [K] Skills"
                },
                Style::default().fg(Color::Yellow),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
    }

    fn render_inventory_overlay(&self, frame: &mut Frame, game: &Game) {
        let Some(player) = game.player() else {
            return;
        };
        let area = centered_rect(60, 60, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Inventory ")
            .border_style(Style::default().fg(Color::Yellow));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = inventory_rows(player);
        let mut lines = Vec::new();
        if rows.is_empty() {
            lines.push(Line::from(Span::styled("Your inventory is empty.", Style::default().fg(Color::DarkGray))));
        }
        let cursor = self.inventory_cursor.min(rows.len().saturating_sub(1));
        for (i, row) in rows.iter().enumerate() {
            lines.push(item_line(row.item, row.equipped, i == cursor, None));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[↑↓] Select  [Enter] Use/Equip  [Esc] Close",
            Style::default().fg(Color::DarkGray),
        )));

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_skills_overlay(&self, frame: &mut Frame, game: &Game) {
        let Some(player) = game.player() else {
            return;
        };
        let area = centered_rect(60, 50, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Skills - Energy {}/{} ", player.energy, player.max_energy))
            .border_style(Style::default().fg(Color::Blue));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = Vec::new();
        for (i, skill) in player.learned_skills.iter().enumerate() {
            let selected = i == self.skill_cursor;
            let affordable = player.energy >= skill.energy_cost;
            let style = match (selected, affordable) {
                (true, _) => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                (false, true) => Style::default().fg(Color::White),
                (false, false) => Style::default().fg(Color::DarkGray),
            };
            lines.push(Line::from(vec![
                Span::styled(if selected { "► " } else { "  " }, style),
                Span::styled(format!("{}. {} ({} EN)", i + 1, skill.name, skill.energy_cost), style),
            ]));
            lines.push(Line::from(Span::styled(
                format!("     {}", skill.description),
                Style::default().fg(Color::Gray),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[1-9/Enter] Use  [Esc] Back",
            Style::default().fg(Color::DarkGray),
        )));

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_character_overlay(&self, frame: &mut Frame, game: &Game) {
        let Some(player) = game.player() else {
            return;
        };
        let area = centered_rect(50, 70, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Character ")
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let stats = &player.stats;
        let mut lines = vec![
            Line::from(Span::styled(
                format!("{} the {}", player.name, player.class_type.name()),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!("Level:   {}", stats.level)),
            Line::from(format!("XP:      {}/{}", player.xp, player.xp_to_next_level)),
            Line::from(format!("HP:      {}/{}", stats.hp, stats.max_hp)),
            Line::from(format!("Energy:  {}/{}", player.energy, player.max_energy)),
            Line::from(format!("Attack:  {}", stats.attack)),
            Line::from(format!("Defense: {}", stats.defense)),
            Line::from(format!("Speed:   {}", stats.speed)),
            Line::from(format!("Credits: {}", player.credits)),
            Line::from(format!(
                "Crystals: {}/{}",
                player.crystals_collected,
                game.config().crystals_to_win
            )),
            Line::from(""),
            Line::from(Span::styled("Equipment", Style::default().fg(Color::Yellow))),
        ];
        for slot in [EquipSlot::Weapon, EquipSlot::Armor] {
            let text = match player.equipment.get(slot) {
                Some(item) => format!("  {}: {} ({})", slot.name(), item.name, item.effect_label()),
                None => format!("  {}: none", slot.name()),
            };
            lines.push(Line::from(text));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Skills", Style::default().fg(Color::Yellow))));
        if player.learned_skills.is_empty() {
            lines.push(Line::from(Span::styled("  none yet", Style::default().fg(Color::DarkGray))));
        }
        for skill in &player.learned_skills {
            lines.push(Line::from(format!("  {} ({} EN)", skill.name, skill.energy_cost)));
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_look_overlay(&self, frame: &mut Frame, game: &Game) {
        let Some(report) = game.look_around() else {
            return;
        };
        let area = centered_rect(40, 40, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Scan ")
            .border_style(Style::default().fg(Color::Magenta));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let strength_color = match report.strength {
            "Very Strong" => Color::Red,
            "Strong" => Color::LightRed,
            "Weak" => Color::Green,
            _ => Color::White,
        };
        let lines = vec![
            Line::from(Span::styled(
                format!("{} ({})", report.name, report.symbol),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("Distance: {:.1}", report.distance)),
            Line::from(""),
            Line::from(format!("HP {}/{}", report.hp, report.max_hp)),
            Line::from(format!("ATK {}  DEF {}  SPD {}", report.attack, report.defense, report.speed)),
            Line::from(""),
            Line::from(vec![
                Span::raw("Threat: "),
                Span::styled(report.strength, Style::default().fg(strength_color)),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
    }

    fn render_shop_overlay(&self, frame: &mut Frame, game: &Game) {
        let (Some(shop), Some(player)) = (game.shop(), game.player()) else {
            return;
        };
        let area = centered_rect(60, 70, frame.area());
        frame.render_widget(Clear, area);

        let title = match self.shop_mode {
            ShopMode::Buy => " Shop - Buy ",
            ShopMode::Sell => " Shop - Sell ",
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Blue));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = vec![
            Line::from(Span::styled(
                format!("Credits: {}", player.credits),
                Style::default().fg(Color::Yellow),
            )),
            Line::from(""),
        ];
        match self.shop_mode {
            ShopMode::Buy => {
                if shop.is_empty() {
                    lines.push(Line::from(Span::styled("Sold out.", Style::default().fg(Color::DarkGray))));
                }
                let cursor = self.shop_selection.min(shop.stock().len().saturating_sub(1));
                for (i, item) in shop.stock().iter().enumerate() {
                    lines.push(item_line(item, false, i == cursor, Some(item.buy_price())));
                }
            }
            ShopMode::Sell => {
                let rows = inventory_rows(player);
                if rows.is_empty() {
                    lines.push(Line::from(Span::styled("Nothing to sell.", Style::default().fg(Color::DarkGray))));
                }
                let cursor = self.sell_selection.min(rows.len().saturating_sub(1));
                for (i, row) in rows.iter().enumerate() {
                    lines.push(item_line(row.item, row.equipped, i == cursor, Some(row.item.sell_price())));
                }
            }
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[↑↓] Select  [Enter] Trade  [Tab] Buy/Sell  [Esc] Leave",
            Style::default().fg(Color::DarkGray),
        )));

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_game_over(&self, frame: &mut Frame, floor: u32, cause: &str) {
        let area = frame.area();

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "YOU HAVE FALLEN",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!("Reached Level: {}", floor)),
            Line::from(""),
            Line::from(Span::styled(cause, Style::default().fg(Color::DarkGray))),
            Line::from(""),
            Line::from(""),
            Line::from(Span::styled(
                "Press [Enter] to continue",
                Style::default().fg(Color::Gray),
            )),
        ];

        let para = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));

        frame.render_widget(para, area);
    }

    fn render_victory(&self, frame: &mut Frame, game: &Game) {
        let area = frame.area();
        let name = game.player().map_or("Explorer", |p| p.name.as_str());

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "VICTORY",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!("Congratulations, {}!", name)),
            Line::from(format!(
                "You collected {} Energy Crystals and completed your mission.",
                game.config().crystals_to_win
            )),
            Line::from("The galaxy is safe, for now..."),
            Line::from(""),
            Line::from(Span::styled(
                "Press [Enter] to continue",
                Style::default().fg(Color::Gray),
            )),
        ];

        let para = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));

        frame.render_widget(para, area);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Blocked actions keep the turn; tell the player why
fn report_blocked(game: &mut Game, error: ActionError) {
    log::debug!("Action blocked: {:?}", error);
    game.add_message(error.to_string(), MessageCategory::Warning);
}

fn hp_color(hp: i32, max_hp: i32) -> Color {
    let pct = hp as f32 / max_hp.max(1) as f32;
    if pct > 0.6 {
        Color::Green
    } else if pct > 0.3 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// One inventory or shop line
fn item_line(item: &Item, equipped: bool, selected: bool, price: Option<u32>) -> Line<'static> {
    let style = if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else if item.is_collectible() {
        Style::default().fg(Color::Magenta)
    } else {
        Style::default().fg(Color::White)
    };
    let mut spans = vec![
        Span::styled(if selected { "► " } else { "  " }, style),
        Span::styled(format!("{:<18}", truncate_name(&item.name, 18)), style),
        Span::styled(format!(" {:<10}", item.effect_label()), Style::default().fg(Color::Gray)),
    ];
    if equipped {
        spans.push(Span::styled(" [E]", Style::default().fg(Color::Cyan)));
    }
    if let Some(price) = price {
        spans.push(Span::styled(format!(" {} cr", price), Style::default().fg(Color::Yellow)));
    }
    Line::from(spans)
}

/// Small yes/no box in the middle of the screen
fn render_prompt(frame: &mut Frame, title: &str, text: &[&str]) {
    let area = centered_rect(50, 25, frame.area());
    frame.render_widget(Clear, area);
    let mut lines = vec![Line::from("")];
    lines.extend(text.iter().map(|line| Line::from(line.to_string())));
    let para = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .border_style(Style::default().fg(Color::Yellow)),
        );
    frame.render_widget(para, area);
}

/// Create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataManager;
    use crate::items::{templates, Catalog};
    use ratatui::{backend::TestBackend, Terminal};
    use tempfile::{tempdir, TempDir};

    fn press(app: &mut App, game: &mut Game, code: KeyCode) -> bool {
        app.handle_input(KeyEvent::new(code, KeyModifiers::NONE), game).unwrap()
    }

    fn test_game() -> (Game, TempDir) {
        let dir = tempdir().unwrap();
        let mut data = DataManager::default();
        data.config.rest_encounter_chance = 0.0;
        let game = Game::with_data(data, Some(42), dir.path().join("savegame.json"));
        (game, dir)
    }

    fn draw(app: &App, game: &Game) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 36)).unwrap();
        terminal.draw(|frame| app.render(frame, game)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_inventory_rows_list_gear_first() {
        let catalog = Catalog::default();
        let mut player = Player::new("Rex", ClassType::Soldier).with_starting_gear(&catalog);
        player.inventory.add(templates::health_potion());

        let rows = inventory_rows(&player);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].choice, ItemChoice::Equipped(EquipSlot::Weapon));
        assert!(rows[1].equipped);
        assert_eq!(rows[2].choice, ItemChoice::Bag(0));
        assert_eq!(rows[2].item.name, "Health Potion");
    }

    #[test]
    fn test_creation_flow() {
        let (mut game, _dir) = test_game();
        let mut app = App::new();

        press(&mut app, &mut game, KeyCode::Char('n'));
        assert_eq!(game.state(), &GameState::CharacterCreation);
        for c in "Ana".chars() {
            press(&mut app, &mut game, KeyCode::Char(c));
        }
        press(&mut app, &mut game, KeyCode::Enter);
        press(&mut app, &mut game, KeyCode::Char('3'));
        press(&mut app, &mut game, KeyCode::Enter);

        assert_eq!(game.state(), &GameState::Playing(PlayingState::Exploring));
        let player = game.player().unwrap();
        assert_eq!(player.name, "Ana");
        assert_eq!(player.class_type, ClassType::Scout);
        assert!(draw(&app, &game).contains("Ana"));
    }

    #[test]
    fn test_blocked_equip_reports_and_keeps_overlay() {
        let (mut game, _dir) = test_game();
        let mut app = App::new();
        game.start_new_run("Rex", ClassType::Soldier).unwrap();

        press(&mut app, &mut game, KeyCode::Char('i'));
        press(&mut app, &mut game, KeyCode::Enter);
        assert_eq!(
            game.state(),
            &GameState::Playing(PlayingState::Inventory { in_combat: false })
        );
        assert_eq!(game.messages().last().unwrap().text, "Laser Pistol is already equipped.");
        assert_eq!(game.turn(), 0);

        press(&mut app, &mut game, KeyCode::Esc);
        assert_eq!(game.state(), &GameState::Playing(PlayingState::Exploring));
    }

    #[test]
    fn test_quit_without_saving() {
        let (mut game, _dir) = test_game();
        let mut app = App::new();
        game.start_new_run("Rex", ClassType::Engineer).unwrap();

        press(&mut app, &mut game, KeyCode::Char('q'));
        assert!(draw(&app, &game).contains("Save before quitting"));
        press(&mut app, &mut game, KeyCode::Esc);
        assert_eq!(game.state(), &GameState::Playing(PlayingState::Exploring));

        press(&mut app, &mut game, KeyCode::Char('q'));
        assert!(press(&mut app, &mut game, KeyCode::Char('n')));
        assert_eq!(game.state(), &GameState::Quit);
        assert!(!game.has_save());
    }

    #[test]
    fn test_screens_render() {
        let (mut game, _dir) = test_game();
        let app = App::new();
        assert!(draw(&app, &game).contains("New Game"));

        game.start_new_run("Rex", ClassType::Soldier).unwrap();
        let screen = draw(&app, &game);
        assert!(screen.contains('@'));
        assert!(screen.contains("Crystals"));

        game.set_state(GameState::GameOver {
            floor_reached: 2,
            cause_of_death: "Defeated by a Cyber-Drone".into(),
        });
        assert!(draw(&app, &game).contains("YOU HAVE FALLEN"));
    }
}
