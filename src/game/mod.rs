//! Game module - Core game logic and state management

mod state;
pub mod ai;
pub mod shop;
pub mod turn;

pub use state::{Game, GameMessage, GameState, LookReport, MessageCategory, PlayingState, DEFAULT_PLAYER_NAME};
pub use shop::{Shop, Trade};
pub use turn::{Side, TurnManager};
