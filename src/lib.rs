//! Snake - terminal Snake with persistent players and highscores
//!
//! This library provides:
//! - Core game logic (game module)
//! - SQLite persistence for players, sessions, highscores and settings (store module)
//! - TUI rendering and keyboard input (render, input modules)
//! - The Login -> Playing -> GameOver screen flow (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod settings;
pub mod store;
