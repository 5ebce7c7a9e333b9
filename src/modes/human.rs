use anyhow::Result;
use tracing::{info, warn};

use crate::game::GameConfig;
use crate::input::InputHandler;
use crate::render::Renderer;
use crate::settings::load_game_config;
use crate::store::{Database, Player};

use super::game_over::{self, GameOverOutcome};
use super::login::{self, LoginOutcome};
use super::playing::{self, GameSummary, PlayOutcome};
use super::tui::Tui;

/// State shared across screens for one run of the program
pub struct SessionContext {
    pub db: Database,
    pub config: GameConfig,
    pub player: Option<Player>,
}

/// Screen the state machine is on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Login,
    Playing,
    GameOver(GameSummary),
}

/// How the program should finish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Player chose to leave
    Normal,
    /// Ctrl+C
    Interrupted,
    TerminalTooSmall {
        width: u16,
        height: u16,
        min_width: u16,
        min_height: u16,
    },
}

pub struct HumanMode {
    context: SessionContext,
    renderer: Renderer,
    input_handler: InputHandler,
}

impl HumanMode {
    /// Loads the game settings from the database
    pub fn new(db: Database) -> Self {
        let config = load_game_config(&db);
        Self::with_config(db, config)
    }

    pub fn with_config(db: Database, config: GameConfig) -> Self {
        Self {
            context: SessionContext {
                db,
                config,
                player: None,
            },
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Drive Login -> Playing -> GameOver until the player leaves. The
    /// terminal is restored before this returns, error or not.
    pub fn run(&mut self) -> Result<Exit> {
        let mut tui = Tui::enter()?;
        let result = self.run_screens(&mut tui);
        settle(result, tui.restore())
    }

    fn run_screens(&mut self, tui: &mut Tui) -> Result<Exit> {
        let mut screen = Screen::Login;

        loop {
            screen = match screen {
                Screen::Login => {
                    let prefill = self.context.player.as_ref().map(|p| p.username.clone());
                    match login::run(
                        tui,
                        &self.context.db,
                        prefill.as_deref(),
                        &self.renderer,
                        &self.input_handler,
                    )? {
                        LoginOutcome::LoggedIn(player) => {
                            self.context.player = Some(player);
                            Screen::Playing
                        }
                        LoginOutcome::Cancelled => return Ok(Exit::Normal),
                        LoginOutcome::Interrupted => return Ok(Exit::Interrupted),
                    }
                }
                Screen::Playing => {
                    let username = self.context.player.as_ref().map(|p| p.username.as_str());
                    match playing::run(
                        tui,
                        &self.context.config,
                        username,
                        &self.renderer,
                        &self.input_handler,
                    )? {
                        PlayOutcome::Finished(summary) => Screen::GameOver(summary),
                        PlayOutcome::Quit => return Ok(Exit::Normal),
                        PlayOutcome::Interrupted => return Ok(Exit::Interrupted),
                        PlayOutcome::TerminalTooSmall { width, height } => {
                            return Ok(Exit::TerminalTooSmall {
                                width,
                                height,
                                min_width: self.context.config.min_terminal_width,
                                min_height: self.context.config.min_terminal_height,
                            })
                        }
                    }
                }
                Screen::GameOver(summary) => {
                    match game_over::run(
                        tui,
                        &self.context.db,
                        self.context.player.as_ref(),
                        summary,
                        self.context.config.highscore_limit,
                        &self.renderer,
                        &self.input_handler,
                    )? {
                        GameOverOutcome::PlayAgain => {
                            info!("starting another game");
                            Screen::Login
                        }
                        GameOverOutcome::Exit => return Ok(Exit::Normal),
                        GameOverOutcome::Interrupted => return Ok(Exit::Interrupted),
                    }
                }
            };
        }
    }
}

/// The game's own error wins over a failed terminal restore; a restore
/// failure after a clean run is still reported.
fn settle<T>(result: Result<T>, restored: Result<()>) -> Result<T> {
    match (result, restored) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(err)) => Err(err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(restore_err)) => {
            warn!(error = %format!("{restore_err:#}"), "failed to restore terminal");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use tempfile::TempDir;

    #[test]
    fn test_game_error_survives_failed_restore() {
        let result: Result<Exit> = settle(
            Err(anyhow!("Failed to draw frame")),
            Err(anyhow!("Failed to disable raw mode")),
        );

        assert_eq!(result.unwrap_err().to_string(), "Failed to draw frame");
    }

    #[test]
    fn test_restore_failure_after_clean_run_is_reported() {
        let result = settle(Ok(Exit::Normal), Err(anyhow!("Failed to show cursor")));
        assert_eq!(result.unwrap_err().to_string(), "Failed to show cursor");

        let result = settle(Ok(Exit::Interrupted), Ok(()));
        assert_eq!(result.unwrap(), Exit::Interrupted);
    }

    #[test]
    fn test_new_loads_config_from_settings() {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::open(temp_dir.path().join("human.db")).unwrap();
        db.add_or_update_setting("food_value", "15", None).unwrap();

        let mode = HumanMode::new(db);

        assert_eq!(mode.context().config.food_value, 15);
        assert!(mode.context().player.is_none());
    }
}
