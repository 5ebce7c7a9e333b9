use super::{
    action::{Action, Direction},
    config::GameConfig,
    state::{EndReason, GameState, Position, Snake},
};
use rand::seq::SliceRandom;
use tracing::debug;

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Why the game ended, if it did
    pub end_reason: Option<EndReason>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

impl StepResult {
    fn finished(end_reason: Option<EndReason>) -> Self {
        Self {
            terminated: true,
            info: StepInfo {
                ate_food: false,
                end_reason,
            },
        }
    }
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: rand::rngs::ThreadRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: rand::thread_rng(),
        }
    }

    /// Start a game on a `grid_width` x `grid_height` playable area.
    ///
    /// The snake starts a quarter of the way across, vertically centred,
    /// heading right. Its length is capped at half the grid width so the
    /// whole body starts on the board.
    pub fn reset(&mut self, grid_width: usize, grid_height: usize) -> GameState {
        let length = self
            .config
            .initial_snake_length
            .min(grid_width / 2)
            .max(1);
        let head_x = (grid_width / 4).max(length - 1) as i32;
        let head_y = (grid_height / 2) as i32;

        let snake = Snake::new(Position::new(head_x, head_y), Direction::Right, length);

        let mut state = GameState::new(
            snake,
            Position::new(0, 0),
            grid_width,
            grid_height,
            self.config.tick_interval(0),
        );

        match self.spawn_food(&state) {
            Some(food) => state.food = food,
            None => state.end(EndReason::BoardFull),
        }

        state
    }

    /// Execute one tick: turn, advance, eat or shrink the tail, then check
    /// for the end of the game.
    pub fn step(&mut self, state: &mut GameState, action: Action) -> StepResult {
        if !state.is_alive {
            return StepResult::finished(None);
        }

        if let Action::Move(requested) = action {
            state.snake.direction = state.snake.direction.turned(requested);
        }

        let new_head = state.snake.head().moved_in_direction(state.snake.direction);
        let ate_food = new_head == state.food;

        state.snake.advance(ate_food);
        state.steps += 1;

        if ate_food {
            state.score = state.score.saturating_add(self.config.food_value);
            state.tick_interval = self.config.tick_interval(state.score);
            debug!(score = state.score, length = state.snake.len(), "food eaten");
        }

        if let Some(reason) = self.check_collision(state) {
            state.end(reason);
            return StepResult {
                terminated: true,
                info: StepInfo {
                    ate_food,
                    end_reason: Some(reason),
                },
            };
        }

        if ate_food {
            match self.spawn_food(state) {
                Some(food) => state.food = food,
                None => {
                    state.end(EndReason::BoardFull);
                    return StepResult {
                        terminated: true,
                        info: StepInfo {
                            ate_food,
                            end_reason: Some(EndReason::BoardFull),
                        },
                    };
                }
            }
        }

        StepResult {
            terminated: false,
            info: StepInfo {
                ate_food,
                end_reason: None,
            },
        }
    }

    /// Follow a terminal resize. Food that fell outside the new bounds is
    /// moved; the snake is left alone and dies on its next step if it is
    /// now outside.
    pub fn resize(&mut self, state: &mut GameState, grid_width: usize, grid_height: usize) {
        state.grid_width = grid_width;
        state.grid_height = grid_height;

        if state.is_alive && !state.is_in_bounds(state.food) {
            match self.spawn_food(state) {
                Some(food) => state.food = food,
                None => state.end(EndReason::BoardFull),
            }
        }
    }

    /// Check the freshly moved head against the walls and the body
    fn check_collision(&self, state: &GameState) -> Option<EndReason> {
        let head = state.snake.head();

        if !state.is_in_bounds(head) {
            return Some(EndReason::Wall);
        }

        if state.snake.collides_with_body(head) {
            return Some(EndReason::SelfCollision);
        }

        None
    }

    /// Pick a free cell uniformly at random
    fn spawn_food(&mut self, state: &GameState) -> Option<Position> {
        state.free_cells().choose(&mut self.rng).copied()
    }
}
