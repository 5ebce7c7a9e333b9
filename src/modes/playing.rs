use anyhow::Result;
use std::time::Instant;
use tracing::{debug, info};

use crate::game::{Action, Direction, EndReason, GameConfig, GameEngine};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

use super::tui::Tui;

/// What a finished game hands to the game-over screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub score: u32,
    pub duration_seconds: i64,
    pub end_reason: Option<EndReason>,
    pub food_eaten: u32,
    pub longest_snake: usize,
    pub moves: u32,
    pub elapsed: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    Finished(GameSummary),
    Quit,
    Interrupted,
    TerminalTooSmall { width: u16, height: u16 },
}

/// Whether the terminal can host a game with this config
pub fn fits(config: &GameConfig, width: u16, height: u16) -> bool {
    width >= config.min_terminal_width && height >= config.min_terminal_height
}

/// Show the size notice and wait for a key
pub fn too_small(
    tui: &mut Tui,
    renderer: &Renderer,
    config: &GameConfig,
    (width, height): (u16, u16),
) -> Result<PlayOutcome> {
    info!(width, height, "terminal too small to play");
    tui.draw(|frame| {
        renderer.render_too_small(frame, config.min_terminal_width, config.min_terminal_height)
    })?;
    tui.next_key()?;
    Ok(PlayOutcome::TerminalTooSmall { width, height })
}

pub fn run(
    tui: &mut Tui,
    config: &GameConfig,
    username: Option<&str>,
    renderer: &Renderer,
    input: &InputHandler,
) -> Result<PlayOutcome> {
    let mut size = tui.size()?;
    if !fits(config, size.0, size.1) {
        return too_small(tui, renderer, config, size);
    }

    let mut engine = GameEngine::new(config.clone());
    let (grid_width, grid_height) = Renderer::playable_size(size.0, size.1);
    let mut state = engine.reset(grid_width, grid_height);
    let mut metrics = GameMetrics::new();
    metrics.on_game_start(&state);
    debug!(grid_width, grid_height, "game started");

    while state.is_alive {
        let current = tui.size()?;
        if current != size {
            if !fits(config, current.0, current.1) {
                return too_small(tui, renderer, config, current);
            }
            let (grid_width, grid_height) = Renderer::playable_size(current.0, current.1);
            engine.resize(&mut state, grid_width, grid_height);
            size = current;
            debug!(grid_width, grid_height, "terminal resized");
        }

        metrics.update();
        tui.draw(|frame| renderer.render_playing(frame, &state, username, &metrics))?;

        // Hold the first direction key of the tick; keep draining until the
        // deadline so the pace does not depend on typing speed.
        let deadline = Instant::now() + state.tick_interval;
        let mut pending: Option<Direction> = None;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            let Some(key) = tui.poll_key(remaining)? else {
                break;
            };
            match input.handle_key_event(key) {
                KeyAction::GameAction(Action::Move(direction)) => {
                    pending.get_or_insert(direction);
                }
                KeyAction::Quit => return Ok(PlayOutcome::Quit),
                KeyAction::Interrupt => return Ok(PlayOutcome::Interrupted),
                KeyAction::GameAction(Action::Continue) | KeyAction::None => {}
            }
        }

        let result = engine.step(&mut state, Action::from(pending));
        metrics.on_step(&result, &state);
    }

    tui.draw(|frame| renderer.render_playing(frame, &state, username, &metrics))?;
    info!(score = state.score, reason = ?state.end_reason, "game over");

    Ok(PlayOutcome::Finished(GameSummary {
        score: state.score,
        duration_seconds: metrics.duration_seconds(),
        end_reason: state.end_reason,
        food_eaten: metrics.food_eaten,
        longest_snake: metrics.longest_snake,
        moves: state.steps,
        elapsed: metrics.format_time(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits_uses_config_minimum() {
        let config = GameConfig::default();
        assert!(fits(&config, 60, 20));
        assert!(fits(&config, 120, 40));
        assert!(!fits(&config, 59, 20));
        assert!(!fits(&config, 60, 19));
    }
}
