use std::time::{Duration, Instant};

use crate::game::{GameState, StepResult};

/// Per-game counters shown in the header and on the game-over screen.
/// The elapsed time becomes the session's recorded duration.
#[derive(Debug, Clone)]
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub food_eaten: u32,
    pub longest_snake: usize,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            food_eaten: 0,
            longest_snake: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_game_start(&mut self, state: &GameState) {
        *self = Self::new();
        self.longest_snake = state.snake.len();
    }

    pub fn on_step(&mut self, result: &StepResult, state: &GameState) {
        if result.info.ate_food {
            self.food_eaten += 1;
        }
        self.longest_snake = self.longest_snake.max(state.snake.len());
        self.update();
    }

    /// Whole seconds played, as stored on a game session
    pub fn duration_seconds(&self) -> i64 {
        i64::try_from(self.elapsed_time.as_secs()).unwrap_or(i64::MAX)
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Action, GameConfig, GameEngine, Position};

    #[test]
    fn test_time_formatting() {
        let mut metrics = GameMetrics::new();
        metrics.elapsed_time = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.elapsed_time = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn test_duration_truncates_to_seconds() {
        let mut metrics = GameMetrics::new();
        metrics.elapsed_time = Duration::from_millis(59_999);
        assert_eq!(metrics.duration_seconds(), 59);
    }

    #[test]
    fn test_counts_food_and_length() {
        let mut engine = GameEngine::new(GameConfig::default());
        let mut state = engine.reset(30, 10);
        let mut metrics = GameMetrics::new();
        metrics.on_game_start(&state);
        assert_eq!(metrics.longest_snake, 3);

        state.food = state.snake.head().moved_in_direction(state.snake.direction);
        let result = engine.step(&mut state, Action::Continue);
        metrics.on_step(&result, &state);

        state.food = Position::new(0, 0);
        let result = engine.step(&mut state, Action::Continue);
        metrics.on_step(&result, &state);

        assert_eq!(metrics.food_eaten, 1);
        assert_eq!(metrics.longest_snake, 4);
    }

    #[test]
    fn test_game_start_resets_time() {
        let mut engine = GameEngine::new(GameConfig::default());
        let state = engine.reset(30, 10);
        let mut metrics = GameMetrics::new();
        std::thread::sleep(Duration::from_millis(50));
        metrics.update();
        assert!(metrics.elapsed_time.as_millis() >= 50);

        metrics.on_game_start(&state);
        metrics.update();
        assert!(metrics.elapsed_time.as_millis() < 50);
    }
}
