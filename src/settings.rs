//! Game configuration backed by the `game_settings` table

use tracing::{info, warn};

use crate::game::GameConfig;
use crate::store::Database;

/// Seed any missing known settings with their defaults, then build the
/// config from what the table holds.
pub fn load_game_config(db: &Database) -> GameConfig {
    let existing = db.get_all_settings();

    for (name, value, description) in GameConfig::default_settings() {
        if existing.iter().any(|setting| setting.setting_name == name) {
            continue;
        }
        if db
            .add_or_update_setting(name, &value, Some(description))
            .is_none()
        {
            warn!(setting = name, "could not seed default setting");
        }
    }

    let settings = db.get_all_settings();
    let config = GameConfig::from_settings(
        settings
            .iter()
            .map(|setting| (setting.setting_name.as_str(), setting.setting_value.as_str())),
    );

    info!(?config, "game configuration loaded");
    config
}
