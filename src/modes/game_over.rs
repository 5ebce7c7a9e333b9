use anyhow::Result;
use tracing::{info, warn};

use crate::input::{InputHandler, MenuKey};
use crate::render::Renderer;
use crate::store::{Database, Player};

use super::playing::GameSummary;
use super::tui::Tui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    PlayAgain,
    ViewHighscores,
    Exit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 3] = [MenuItem::PlayAgain, MenuItem::ViewHighscores, MenuItem::Exit];

    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::PlayAgain => "Play Again",
            MenuItem::ViewHighscores => "View Highscores",
            MenuItem::Exit => "Exit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverOutcome {
    PlayAgain,
    Exit,
    Interrupted,
}

/// Result of a finished game as shown to the player
#[derive(Debug, Clone)]
pub struct GameOverScreen {
    pub summary: GameSummary,
    pub highscore: Option<i64>,
    pub new_best: bool,
    pub message: Option<String>,
    pub selected: usize,
}

impl GameOverScreen {
    /// Record the session for `player` (if any) and look up their best score.
    /// Storage problems end up in `message`, never as an error.
    pub fn record(db: &Database, player: Option<&Player>, summary: GameSummary) -> Self {
        let mut screen = Self {
            summary,
            highscore: None,
            new_best: false,
            message: None,
            selected: 0,
        };

        let Some(player) = player else {
            return screen;
        };

        let previous_best = db.get_player_highscore(player.id).map(|best| best.score);
        let score = i64::from(screen.summary.score);

        match db.add_game_session(player.id, score, screen.summary.duration_seconds, None) {
            Some(session_id) => {
                info!(session_id, player_id = player.id, score, "score saved");
                screen.new_best = previous_best.map_or(true, |best| score > best);
            }
            None => {
                warn!(player_id = player.id, score, "score was not saved");
                screen.message = Some("Error saving score, see the log for details".to_string());
            }
        }

        screen.highscore = db.get_player_highscore(player.id).map(|best| best.score);
        screen
    }

    pub fn selected_item(&self) -> MenuItem {
        MenuItem::ALL[self.selected]
    }

    /// Move the selection; returns the chosen item on confirm
    pub fn handle(&mut self, key: MenuKey) -> Option<MenuItem> {
        match key {
            MenuKey::Up => self.selected = self.selected.saturating_sub(1),
            MenuKey::Down => self.selected = (self.selected + 1).min(MenuItem::ALL.len() - 1),
            MenuKey::Confirm => return Some(self.selected_item()),
            MenuKey::Back => return Some(MenuItem::Exit),
            MenuKey::Interrupt | MenuKey::None => {}
        }
        None
    }
}

pub fn run(
    tui: &mut Tui,
    db: &Database,
    player: Option<&Player>,
    summary: GameSummary,
    highscore_limit: usize,
    renderer: &Renderer,
    input: &InputHandler,
) -> Result<GameOverOutcome> {
    let mut screen = GameOverScreen::record(db, player, summary);
    let username = player.map(|player| player.username.as_str());

    loop {
        tui.draw(|frame| renderer.render_game_over(frame, &screen, username))?;

        let key = input.handle_menu_key(tui.next_key()?);
        if key == MenuKey::Interrupt {
            return Ok(GameOverOutcome::Interrupted);
        }

        match screen.handle(key) {
            Some(MenuItem::PlayAgain) => return Ok(GameOverOutcome::PlayAgain),
            Some(MenuItem::Exit) => return Ok(GameOverOutcome::Exit),
            Some(MenuItem::ViewHighscores) => {
                let entries = db.get_highscores(highscore_limit);
                let player_id = player.map(|player| player.id);
                tui.draw(|frame| renderer.render_highscores(frame, &entries, player_id))?;

                if input.handle_menu_key(tui.next_key()?) == MenuKey::Interrupt {
                    return Ok(GameOverOutcome::Interrupted);
                }
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn summary(score: u32) -> GameSummary {
        GameSummary {
            score,
            duration_seconds: 42,
            end_reason: None,
            food_eaten: score / 10,
            longest_snake: 3,
            moves: 40,
            elapsed: "00:42".to_string(),
        }
    }

    fn screen() -> GameOverScreen {
        GameOverScreen {
            summary: summary(0),
            highscore: None,
            new_best: false,
            message: None,
            selected: 0,
        }
    }

    #[test]
    fn test_menu_navigation_clamps() {
        let mut screen = screen();

        assert_eq!(screen.handle(MenuKey::Up), None);
        assert_eq!(screen.selected_item(), MenuItem::PlayAgain);

        screen.handle(MenuKey::Down);
        screen.handle(MenuKey::Down);
        screen.handle(MenuKey::Down);
        assert_eq!(screen.selected_item(), MenuItem::Exit);

        screen.handle(MenuKey::Up);
        assert_eq!(screen.handle(MenuKey::Confirm), Some(MenuItem::ViewHighscores));
    }

    #[test]
    fn test_back_means_exit() {
        let mut screen = screen();
        assert_eq!(screen.handle(MenuKey::Back), Some(MenuItem::Exit));
    }

    #[test]
    fn test_record_saves_session_and_reports_best() {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::open(temp_dir.path().join("game_over.db")).unwrap();
        let id = db.add_player("alice").unwrap();
        let player = db.get_player_by_id(id).unwrap();

        let first = GameOverScreen::record(&db, Some(&player), summary(50));
        assert!(first.new_best);
        assert_eq!(first.highscore, Some(50));
        assert!(first.message.is_none());

        let second = GameOverScreen::record(&db, Some(&player), summary(30));
        assert!(!second.new_best);
        assert_eq!(second.highscore, Some(50));

        let sessions = db.get_player_game_sessions(id);
        assert_eq!(sessions.len(), 2);
        assert!(sessions.iter().all(|session| session.duration_seconds == 42));
    }

    #[test]
    fn test_record_failure_is_reported_inline() {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::open(temp_dir.path().join("game_over.db")).unwrap();
        let id = db.add_player("alice").unwrap();
        let player = db.get_player_by_id(id).unwrap();
        db.delete_player(id);

        let screen = GameOverScreen::record(&db, Some(&player), summary(10));

        assert!(screen.message.is_some());
        assert_eq!(screen.highscore, None);
        assert!(!screen.new_best);
    }

    #[test]
    fn test_record_without_player_touches_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::open(temp_dir.path().join("game_over.db")).unwrap();

        let screen = GameOverScreen::record(&db, None, summary(10));

        assert!(screen.message.is_none());
        assert!(db.get_highscores(10).is_empty());
    }
}
