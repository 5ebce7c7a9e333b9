use anyhow::Result;
use tracing::info;

use crate::input::{InputHandler, TextKey};
use crate::render::Renderer;
use crate::store::{Database, Player};

use super::tui::Tui;

/// Longest username accepted from the keyboard
pub const MAX_USERNAME_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginEvent {
    Pending,
    Submit(String),
    Cancel,
    Interrupt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    LoggedIn(Player),
    Cancelled,
    Interrupted,
}

/// Username entry with Tab-completion over known players
#[derive(Debug, Clone)]
pub struct LoginScreen {
    pub input: String,
    pub known_players: Vec<String>,
    pub message: Option<String>,
    completion: Option<usize>,
}

impl LoginScreen {
    pub fn new(prefill: Option<&str>, known_players: Vec<String>) -> Self {
        Self {
            input: prefill.unwrap_or_default().to_string(),
            known_players,
            message: None,
            completion: None,
        }
    }

    pub fn handle(&mut self, key: TextKey) -> LoginEvent {
        match key {
            TextKey::Char(c) => {
                if !c.is_control() && self.input.chars().count() < MAX_USERNAME_LEN {
                    self.input.push(c);
                }
                self.completion = None;
                self.message = None;
            }
            TextKey::Backspace => {
                self.input.pop();
                self.completion = None;
            }
            TextKey::Complete => self.complete(),
            TextKey::Submit => {
                let name = self.input.trim();
                if name.is_empty() {
                    self.message = Some("Username cannot be empty".to_string());
                } else {
                    return LoginEvent::Submit(name.to_string());
                }
            }
            TextKey::Cancel => return LoginEvent::Cancel,
            TextKey::Interrupt => return LoginEvent::Interrupt,
            TextKey::None => {}
        }
        LoginEvent::Pending
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    fn complete(&mut self) {
        if self.known_players.is_empty() {
            return;
        }
        let next = self
            .completion
            .map_or(0, |index| (index + 1) % self.known_players.len());
        self.completion = Some(next);
        self.input = self.known_players[next].clone();
    }
}

/// Find the player by name, creating them on first login
pub fn resolve_player(db: &Database, username: &str) -> Option<Player> {
    if let Some(player) = db.get_player_by_username(username) {
        info!(player_id = player.id, username, "player logged in");
        return Some(player);
    }

    let player_id = db.add_player(username)?;
    info!(player_id, username, "new player created");
    db.get_player_by_id(player_id)
}

pub fn run(
    tui: &mut Tui,
    db: &Database,
    prefill: Option<&str>,
    renderer: &Renderer,
    input: &InputHandler,
) -> Result<LoginOutcome> {
    let known = db
        .get_all_players()
        .into_iter()
        .map(|player| player.username)
        .collect();
    let mut screen = LoginScreen::new(prefill, known);

    loop {
        tui.draw(|frame| renderer.render_login(frame, &screen))?;

        let key = tui.next_key()?;
        match screen.handle(input.handle_text_key(key)) {
            LoginEvent::Pending => {}
            LoginEvent::Cancel => return Ok(LoginOutcome::Cancelled),
            LoginEvent::Interrupt => return Ok(LoginOutcome::Interrupted),
            LoginEvent::Submit(name) => match resolve_player(db, &name) {
                Some(player) => return Ok(LoginOutcome::LoggedIn(player)),
                None => screen.show_error(format!("Could not load or create player '{name}'")),
            },
        }
    }
}
