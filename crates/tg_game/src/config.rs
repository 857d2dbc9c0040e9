//! Game tunables, loaded from an optional JSON file.
//!
//! Every field has a default, so a config file only needs the values it wants
//! to change. `{}` is a valid config.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use tg_core::time::Timestep;

/// What happens to the player's score when they lose their last hit point.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScorePenalty {
    #[default]
    Halve,
    Reset,
}

impl ScorePenalty {
    pub fn apply(self, score: i32) -> i32 {
        match self {
            Self::Halve => score / 2,
            Self::Reset => 0,
        }
    }
}

/// Which edges of the world block movement on their own.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Only columns left of x = 0 are solid; the right, top and bottom edges
    /// must be walled off by the level itself.
    #[default]
    LeftOnly,
    /// Every cell outside the grid is solid.
    Enclosed,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TimestepConfig {
    #[default]
    Variable,
    Fixed { step_ms: u64 },
}

impl From<TimestepConfig> for Timestep {
    fn from(value: TimestepConfig) -> Self {
        match value {
            TimestepConfig::Variable => Timestep::Variable,
            TimestepConfig::Fixed { step_ms } => Timestep::Fixed { step_ms },
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct Nudge {
    pub x: f32,
    pub y: f32,
}

impl Default for Nudge {
    fn default() -> Self {
        Self { x: 15.0, y: 30.0 }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: i32,
    pub height: i32,
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    /// Downward acceleration in px/ms².
    pub gravity: f32,
    pub player_die_ms: u64,
    pub creature_die_ms: u64,
    pub creature_upgrade_secs: u64,
    pub enrage_threshold: i32,
    pub score_penalty: ScorePenalty,
    pub boundary: BoundaryPolicy,
    pub timestep: TimestepConfig,
    pub grace_nudge: Nudge,
    pub screen: ScreenSize,
    pub tile_kinds: u8,
    pub player_spawn_tile_x: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gravity: 0.002,
            player_die_ms: 1500,
            creature_die_ms: 1000,
            creature_upgrade_secs: 30,
            enrage_threshold: 10,
            score_penalty: ScorePenalty::default(),
            boundary: BoundaryPolicy::default(),
            timestep: TimestepConfig::default(),
            grace_nudge: Nudge::default(),
            screen: ScreenSize::default(),
            tile_kinds: 26,
            player_spawn_tile_x: 3,
        }
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &GameConfig) -> Result<(), String> {
    if !config.gravity.is_finite() || config.gravity < 0.0 {
        return Err("Config validation failed: gravity must be a finite value >= 0".to_string());
    }
    if let TimestepConfig::Fixed { step_ms } = config.timestep {
        if step_ms == 0 {
            return Err("Config validation failed: fixed step_ms must be > 0".to_string());
        }
    }
    if config.screen.width <= 0 || config.screen.height <= 0 {
        return Err("Config validation failed: screen size must be > 0".to_string());
    }
    if config.tile_kinds > 26 {
        return Err(format!(
            "Config validation failed: tile_kinds {} exceeds 'A'..='Z'",
            config.tile_kinds
        ));
    }
    if config.player_die_ms == 0 {
        log::warn!("player_die_ms is 0: the death animation will be skipped");
    }
    Ok(())
}
