//! User Interface module
//!
//! Terminal UI using ratatui.

pub mod app;

pub use app::{inventory_rows, App, InventoryRow};
