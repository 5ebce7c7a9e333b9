use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::warn;

/// Tunables for a game, overridable through the `game_settings` table.
///
/// Field names double as setting names, so a row
/// `("food_value", "25")` replaces [`GameConfig::food_value`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Points gained when eating food
    pub food_value: u32,
    /// Tick interval at score zero, in milliseconds
    pub base_tick_ms: u64,
    /// Floor for the tick interval, in milliseconds
    pub min_tick_ms: u64,
    /// Interval reduction per 50 points, in milliseconds
    pub tick_step_ms: u64,
    /// Smallest terminal width the game starts in
    pub min_terminal_width: u16,
    /// Smallest terminal height the game starts in
    pub min_terminal_height: u16,
    /// Rows shown on the highscore table
    pub highscore_limit: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_snake_length: 3,
            food_value: 10,
            base_tick_ms: 100,
            min_tick_ms: 50,
            tick_step_ms: 5,
            min_terminal_width: 60,
            min_terminal_height: 20,
            highscore_limit: 10,
        }
    }
}

const SETTING_DESCRIPTIONS: &[(&str, &str)] = &[
    ("initial_snake_length", "Number of cells the snake starts with"),
    ("food_value", "Points gained when eating food"),
    ("base_tick_ms", "Milliseconds between moves at the start of a game"),
    ("min_tick_ms", "Fastest allowed milliseconds between moves"),
    ("tick_step_ms", "Milliseconds removed from the interval every 50 points"),
    ("min_terminal_width", "Minimum terminal width in columns"),
    ("min_terminal_height", "Minimum terminal height in rows"),
    ("highscore_limit", "Number of entries on the highscore table"),
];

impl GameConfig {
    /// Tick interval for a score: `max(min, base - (score / 50) * step)`
    pub fn tick_interval(&self, score: u32) -> Duration {
        let reduction = u64::from(score / 50).saturating_mul(self.tick_step_ms);
        let millis = self
            .base_tick_ms
            .saturating_sub(reduction)
            .max(self.min_tick_ms);
        Duration::from_millis(millis)
    }

    /// Known settings with their default values and descriptions, used to
    /// seed an empty settings table.
    pub fn default_settings() -> Vec<(&'static str, String, &'static str)> {
        let defaults = match serde_json::to_value(Self::default()) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };

        SETTING_DESCRIPTIONS
            .iter()
            .filter_map(|(name, description)| {
                defaults
                    .get(*name)
                    .map(|value| (*name, value.to_string(), *description))
            })
            .collect()
    }

    /// Build a config from `(setting_name, setting_value)` pairs layered over
    /// the defaults. Unknown names are ignored; values that do not fit the
    /// field's type are skipped with a warning, and values the game cannot
    /// run with are clamped (see [`GameConfig::clamped`]).
    pub fn from_settings<'a, I>(settings: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut merged = match serde_json::to_value(Self::default()) {
            Ok(Value::Object(map)) => map,
            _ => return Self::default(),
        };

        for (name, raw) in settings {
            if !merged.contains_key(name) {
                continue;
            }

            let mut candidate = merged.clone();
            candidate.insert(name.to_string(), parse_setting_value(raw));

            match serde_json::from_value::<Self>(Value::Object(candidate.clone())) {
                Ok(_) => merged = candidate,
                Err(err) => {
                    warn!(setting = name, value = raw, error = %err, "ignoring malformed setting")
                }
            }
        }

        serde_json::from_value::<Self>(Value::Object(merged))
            .unwrap_or_default()
            .clamped()
    }

    /// Pull out-of-range values back into what the engine and the game loop
    /// accept. The snake length is also capped against the grid at reset.
    pub fn clamped(mut self) -> Self {
        if self.initial_snake_length == 0 {
            warn!("initial_snake_length must be at least 1, using 1");
            self.initial_snake_length = 1;
        }
        if self.base_tick_ms == 0 {
            warn!("base_tick_ms must be at least 1, using the default");
            self.base_tick_ms = Self::default().base_tick_ms;
        }
        if self.min_tick_ms == 0 {
            warn!("min_tick_ms must be at least 1, using 1");
            self.min_tick_ms = 1;
        }
        if self.min_tick_ms > self.base_tick_ms {
            warn!(
                min_tick_ms = self.min_tick_ms,
                base_tick_ms = self.base_tick_ms,
                "min_tick_ms is above base_tick_ms, lowering it"
            );
            self.min_tick_ms = self.base_tick_ms;
        }
        if self.highscore_limit == 0 {
            warn!("highscore_limit must be at least 1, using the default");
            self.highscore_limit = Self::default().highscore_limit;
        }
        self
    }
}

/// Settings are stored as text; numbers and booleans are read as JSON,
/// anything else stays a string.
fn parse_setting_value(raw: &str) -> Value {
    serde_json::from_str(raw.trim()).unwrap_or_else(|_| Value::String(raw.to_string()))
}
