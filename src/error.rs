//! Error types shared across the game core
//!
//! Blocked or invalid player actions never consume a turn; they are
//! reported back to the caller so the UI can re-prompt.

use thiserror::Error;

/// A player action that could not be carried out
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("Invalid selection.")]
    InvalidSelection,
    #[error("Not enough energy to use {skill}! (needs {cost}, have {energy})")]
    NotEnoughEnergy { skill: String, cost: i32, energy: i32 },
    #[error("{0} is already equipped.")]
    AlreadyEquipped(String),
    #[error("{0} cannot be used.")]
    NotUsable(String),
    #[error("You cannot sell {0}; it is needed for your mission.")]
    CannotSellCollectible(String),
    #[error("You cannot sell {0} while it is equipped.")]
    CannotSellEquipped(String),
    #[error("Not enough credits! {item} costs {price}, you have {credits}.")]
    NotEnoughCredits { item: String, price: u32, credits: u32 },
    #[error("You have not learned any skills yet.")]
    NoSkills,
    #[error("The encounter is already over.")]
    CombatOver,
}

/// Floor generation could not produce a usable layout
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("no empty floor tiles left for feature placement")]
    EmptyTilePool,
    #[error("no floor tile far enough from the start for an exit")]
    NoDistantExit,
    #[error("floor generation failed after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: Box<GenerationError> },
}

/// Reading or writing the RON data files failed
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("failed to serialize {file}: {source}")]
    Serialize {
        file: String,
        #[source]
        source: ron::Error,
    },
}
