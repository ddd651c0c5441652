//! Tunable game constants, optionally loaded from a JSON file.
//!
//! Every field has a default, so a config file only needs to list the
//! values it changes.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Play field ===
    pub field_width: i32,
    pub field_height: i32,

    // === Obstacles ===
    pub obstacle_count: usize,
    /// Per-axis speed; obstacles always move diagonally.
    pub obstacle_speed: i32,
    pub obstacle_radius_min: i32,
    pub obstacle_radius_max: i32,

    // === Player ===
    /// Per-key displacement per tick.
    pub player_step: i32,
    /// Centre of the player at session start.
    pub player_start: (i32, i32),
    pub player_size: (i32, i32),

    // === Projectiles & effects ===
    /// Unrotated (facing right) projectile size.
    pub projectile_size: (i32, i32),
    pub explosion_size: (i32, i32),
    pub explosion_duration_ms: u64,
    pub defeat_pause_ms: u64,

    // === Loop ===
    pub ticks_per_second: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: 1600,
            field_height: 900,

            obstacle_count: 5,
            obstacle_speed: 5,
            obstacle_radius_min: 10,
            obstacle_radius_max: 100,

            player_step: 5,
            player_start: (900, 400),
            player_size: (96, 96),

            projectile_size: (64, 24),
            explosion_size: (120, 120),
            explosion_duration_ms: 3000,
            defeat_pause_ms: 1000,

            ticks_per_second: 50,
        }
    }
}

impl GameConfig {
    /// Read a JSON config file.  Missing fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, GameError> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_json(&text).map_err(|source| GameError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Reject values the simulation cannot run with: empty or inverted
    /// ranges, non-positive sizes and negative speeds.
    pub fn validate(&self) -> Result<(), GameError> {
        let invalid = |reason: String| -> Result<(), GameError> {
            Err(GameError::InvalidConfig(reason))
        };

        if self.field_width <= 0 || self.field_height <= 0 {
            return invalid(format!(
                "field must be positive, got {}x{}",
                self.field_width, self.field_height
            ));
        }
        if self.obstacle_radius_min <= 0 || self.obstacle_radius_min > self.obstacle_radius_max {
            return invalid(format!(
                "obstacle radius range {}..={} is empty or not positive",
                self.obstacle_radius_min, self.obstacle_radius_max
            ));
        }
        if i64::from(self.obstacle_radius_max) * 2
            > i64::from(self.field_width.max(self.field_height))
        {
            return invalid(format!(
                "obstacle radius {} does not fit a {}x{} field",
                self.obstacle_radius_max, self.field_width, self.field_height
            ));
        }
        if self.obstacle_speed < 0 || self.player_step < 0 {
            return invalid(format!(
                "speeds must not be negative, got obstacle {} and player {}",
                self.obstacle_speed, self.player_step
            ));
        }
        for (name, (w, h)) in [
            ("player_size", self.player_size),
            ("projectile_size", self.projectile_size),
            ("explosion_size", self.explosion_size),
        ] {
            if w <= 0 || h <= 0 {
                return invalid(format!("{name} must be positive, got {w}x{h}"));
            }
        }
        Ok(())
    }

    /// Wall-clock budget for one tick.
    pub fn tick_duration(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.ticks_per_second.max(1)))
    }
}
