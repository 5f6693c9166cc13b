//! One-on-one combat encounters
//!
//! An `Encounter` is driven one player action at a time. Each call to
//! [`Encounter::act`] resolves the player's step, then every enemy step up
//! to the player's next turn, or until the fight is over.

use rand::seq::SliceRandom;
use rand::Rng;

use super::damage::{attack_target, flee_chance};
use super::effects::{apply_skill, CombatBoost};
use crate::entities::{Enemy, EnemyId, ItemChoice, Player};
use crate::error::ActionError;
use crate::game::turn::{Side, TurnManager};
use crate::items::Catalog;
use crate::progression::LevelUp;
use crate::world::Floor;

/// Terminal states of an encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatOutcome {
    PlayerDefeated,
    EnemyDefeated,
    Fled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatState {
    Active,
    Over(CombatOutcome),
}

/// What the player does on their step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Attack,
    UseItem(ItemChoice),
    Flee,
    /// Index into the player's learned skills
    UseSkill(usize),
}

/// Spoils of a won fight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewards {
    pub xp: u32,
    pub credits: u32,
    pub drop: Option<String>,
    pub level_ups: Vec<LevelUp>,
}

/// Everything that happened during one call into the encounter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombatReport {
    pub messages: Vec<String>,
    pub outcome: Option<CombatOutcome>,
    pub rewards: Option<Rewards>,
}

/// Mutable game state a fight reads and writes
pub struct Arena<'a> {
    pub player: &'a mut Player,
    pub floor: &'a mut Floor,
    pub catalog: &'a Catalog,
}

/// The engaged enemy: normally on the floor, but an ambusher with no room
/// to stand (or a foe already pruned by an area blast) is held here
#[derive(Debug, Clone)]
enum Opponent {
    OnFloor(EnemyId),
    Detached(Enemy),
}

fn resolve<'s>(opponent: &'s Opponent, floor: &'s Floor) -> Option<&'s Enemy> {
    match opponent {
        Opponent::OnFloor(id) => floor.enemy(*id),
        Opponent::Detached(enemy) => Some(enemy),
    }
}

fn resolve_mut<'s>(opponent: &'s mut Opponent, floor: &'s mut Floor) -> Option<&'s mut Enemy> {
    match opponent {
        Opponent::OnFloor(id) => floor.enemy_mut(*id),
        Opponent::Detached(enemy) => Some(enemy),
    }
}

/// A running fight between the player and one enemy
#[derive(Debug, Clone)]
pub struct Encounter {
    opponent: Opponent,
    turns: TurnManager,
    /// Skill boosts to take back off when the fight ends
    boost: CombatBoost,
    state: CombatState,
}

impl Encounter {
    /// Start a fight with an enemy standing on the floor. If the enemy is
    /// faster it strikes before the player gets to act.
    pub fn engage(enemy_id: EnemyId, arena: &mut Arena) -> (Self, CombatReport) {
        Self::begin(Opponent::OnFloor(enemy_id), arena)
    }

    /// Start a fight with an enemy that has no place on the floor
    pub fn ambush(enemy: Enemy, arena: &mut Arena) -> (Self, CombatReport) {
        Self::begin(Opponent::Detached(enemy), arena)
    }

    fn begin(opponent: Opponent, arena: &mut Arena) -> (Self, CombatReport) {
        let mut encounter = Self {
            opponent,
            turns: TurnManager::new(),
            boost: CombatBoost::default(),
            state: CombatState::Active,
        };
        let mut report = CombatReport::default();
        if let Some(enemy) = resolve(&encounter.opponent, arena.floor) {
            log::debug!("Encounter with {} (id {})", enemy.name, enemy.id);
            report.messages.push(format!("Combat started with {}!", enemy.name));
        }
        encounter.start_round(arena);
        encounter.run_until_player_turn(arena, &mut report);
        (encounter, report)
    }

    pub fn state(&self) -> CombatState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == CombatState::Active
    }

    pub fn round(&self) -> u32 {
        self.turns.round()
    }

    /// The engaged enemy, for display
    pub fn enemy<'s>(&'s self, floor: &'s Floor) -> Option<&'s Enemy> {
        resolve(&self.opponent, floor)
    }

    /// Resolve the player's step and the enemy steps that follow it.
    /// Errors leave the fight exactly as it was and the player keeps the turn.
    pub fn act<R: Rng + ?Sized>(
        &mut self,
        action: PlayerAction,
        arena: &mut Arena,
        rng: &mut R,
    ) -> Result<CombatReport, ActionError> {
        if !self.is_active() {
            return Err(ActionError::CombatOver);
        }
        let mut report = CombatReport::default();

        match action {
            PlayerAction::Attack => {
                if let Some(enemy) = resolve_mut(&mut self.opponent, arena.floor) {
                    let result = attack_target(&*arena.player, enemy);
                    report.messages.push(result.message);
                }
            }
            PlayerAction::UseItem(choice) => {
                let used = arena.player.use_item(choice)?;
                report.messages.push(used.message());
            }
            PlayerAction::Flee => {
                let enemy_speed = resolve(&self.opponent, arena.floor).map_or(0, |e| e.stats.speed);
                let chance = flee_chance(arena.player.stats.speed, enemy_speed);
                if rng.gen_bool(chance) {
                    report.messages.push("You successfully escaped!".to_string());
                    let open = arena.floor.open_neighbours(arena.player.position);
                    if let Some(pos) = open.choose(rng) {
                        arena.player.position = *pos;
                    }
                    self.finish(CombatOutcome::Fled, arena, &mut report);
                    return Ok(report);
                }
                report.messages.push("You failed to escape!".to_string());
            }
            PlayerAction::UseSkill(index) => self.use_skill(index, arena, &mut report)?,
        }

        self.advance(arena);
        self.run_until_player_turn(arena, &mut report);
        Ok(report)
    }

    fn use_skill(&mut self, index: usize, arena: &mut Arena, report: &mut CombatReport) -> Result<(), ActionError> {
        if arena.player.learned_skills.is_empty() {
            return Err(ActionError::NoSkills);
        }
        let skill = arena
            .player
            .learned_skills
            .get(index)
            .cloned()
            .ok_or(ActionError::InvalidSelection)?;
        if arena.player.energy < skill.energy_cost {
            return Err(ActionError::NotEnoughEnergy {
                skill: skill.name,
                cost: skill.energy_cost,
                energy: arena.player.energy,
            });
        }
        arena.player.energy -= skill.energy_cost;
        report.messages.push(format!("You use {}!", skill.name));

        let player = &mut *arena.player;
        let area = skill.effect.is_area();
        let outcome = match (&mut self.opponent, area) {
            (Opponent::OnFloor(id), false) => apply_skill(player, skill.effect, arena.floor.enemy_mut(*id)),
            (Opponent::OnFloor(_), true) => apply_skill(player, skill.effect, arena.floor.entities.iter_mut()),
            (Opponent::Detached(enemy), false) => apply_skill(player, skill.effect, Some(enemy)),
            (Opponent::Detached(enemy), true) => apply_skill(
                player,
                skill.effect,
                std::iter::once(enemy).chain(arena.floor.entities.iter_mut()),
            ),
        };
        self.boost.accumulate(outcome.boost);
        report.messages.extend(outcome.messages);

        if area {
            self.prune_fallen(arena, report);
        }
        Ok(())
    }

    /// Remove enemies killed by an area effect. The engaged one is kept
    /// aside so the fight can still resolve and pay out.
    fn prune_fallen(&mut self, arena: &mut Arena, report: &mut CombatReport) {
        for enemy in arena.floor.remove_dead_enemies() {
            let engaged = matches!(self.opponent, Opponent::OnFloor(id) if id == enemy.id);
            if engaged {
                self.opponent = Opponent::Detached(enemy);
            } else {
                report.messages.push(format!("{} has been defeated!", enemy.name));
            }
        }
    }

    fn start_round(&mut self, arena: &Arena) {
        let enemy_speed = resolve(&self.opponent, arena.floor).map_or(0, |e| e.stats.speed);
        self.turns.start_round(arena.player.stats.speed, enemy_speed);
    }

    /// Move to the next step, opening a new round when this one is spent
    fn advance(&mut self, arena: &Arena) {
        if !self.turns.next_turn() {
            self.start_round(arena);
        }
    }

    fn run_until_player_turn(&mut self, arena: &mut Arena, report: &mut CombatReport) {
        loop {
            if let Some(outcome) = self.check_outcome(arena) {
                self.finish(outcome, arena, report);
                return;
            }
            match self.turns.current() {
                Some(Side::Player) => return,
                Some(Side::Enemy) => {
                    if let Some(enemy) = resolve(&self.opponent, arena.floor) {
                        let result = attack_target(enemy, &mut *arena.player);
                        report.messages.push(result.message);
                    }
                    self.advance(arena);
                }
                None => self.advance(arena),
            }
        }
    }

    fn check_outcome(&self, arena: &Arena) -> Option<CombatOutcome> {
        if !arena.player.stats.is_alive() {
            return Some(CombatOutcome::PlayerDefeated);
        }
        match resolve(&self.opponent, arena.floor) {
            Some(enemy) if enemy.stats.is_alive() => None,
            _ => Some(CombatOutcome::EnemyDefeated),
        }
    }

    fn finish(&mut self, outcome: CombatOutcome, arena: &mut Arena, report: &mut CombatReport) {
        if !self.boost.is_empty() {
            arena.player.stats.defense -= self.boost.defense;
            arena.player.stats.speed -= self.boost.speed;
            self.boost = CombatBoost::default();
            report.messages.push("Your combat enhancements wear off.".to_string());
        }
        self.state = CombatState::Over(outcome);
        report.outcome = Some(outcome);
        log::debug!("Encounter finished: {:?}", outcome);

        match outcome {
            CombatOutcome::EnemyDefeated => {
                let defeated = match &self.opponent {
                    Opponent::OnFloor(id) => arena.floor.remove_enemy(*id),
                    Opponent::Detached(enemy) => Some(enemy.clone()),
                };
                if let Some(enemy) = defeated {
                    report.rewards = Some(award(enemy, arena, report));
                }
            }
            CombatOutcome::PlayerDefeated => report.messages.push("You were defeated!".to_string()),
            CombatOutcome::Fled => {}
        }
    }
}

/// Hand the defeated enemy's XP, credits and drop to the player
fn award(enemy: Enemy, arena: &mut Arena, report: &mut CombatReport) -> Rewards {
    report.messages.push(format!("You defeated the {}!", enemy.name));

    let level_ups = arena.player.add_xp(enemy.xp_value, arena.catalog);
    arena.player.credits = arena.player.credits.saturating_add(enemy.credit_value);
    report.messages.push(format!(
        "You gained {} XP and {} Credits!",
        enemy.xp_value, enemy.credit_value
    ));
    for level_up in &level_ups {
        report.messages.push(format!("LEVEL UP! You are now level {}!", level_up.level));
        if let Some(skill) = &level_up.unlocked {
            report.messages.push(format!("You learned a new skill: {}!", skill));
        }
    }

    let drop = enemy.item_drop.map(|item| {
        report.messages.push(format!("The {} dropped a {}!", enemy.name, item.name));
        let name = item.name.clone();
        arena.player.inventory.add(item);
        name
    });

    Rewards {
        xp: enemy.xp_value,
        credits: enemy.credit_value,
        drop,
        level_ups,
    }
}
