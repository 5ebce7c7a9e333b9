pub mod game_over;
pub mod human;
pub mod login;
pub mod playing;
pub mod tui;

pub use human::{Exit, HumanMode, Screen, SessionContext};
