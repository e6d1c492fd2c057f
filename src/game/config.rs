use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::grid::Grid;
use crate::error::ConfigError;

/// Configuration for the game, fixed for the lifetime of an engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board width in frame units
    pub board_width: i32,
    /// Board height in frame units
    pub board_height: i32,
    /// Side of one cell; must divide both board dimensions
    pub cell_size: i32,
    /// Minimum wall-clock time between two simulation steps
    pub tick_interval_seconds: f64,
    /// Minimum time between two accepted direction changes
    pub direction_cooldown_seconds: f64,
    /// Pointer displacement (per axis) ignored around the head
    pub dead_zone_pixels: f64,
    /// Score added per food eaten
    pub food_reward: u32,
    /// Seed for food placement; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: 640,
            board_height: 480,
            cell_size: 20,
            tick_interval_seconds: 0.12,
            direction_cooldown_seconds: 0.15,
            dead_zone_pixels: 40.0,
            food_reward: 10,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom board, keeping default timings
    pub fn new(board_width: i32, board_height: i32, cell_size: i32) -> Self {
        Self {
            board_width,
            board_height,
            cell_size,
            ..Default::default()
        }
    }

    /// Same configuration with a fixed food-placement seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("board_width", self.board_width),
            ("board_height", self.board_height),
            ("cell_size", self.cell_size),
        ] {
            if value <= 0 {
                return Err(ConfigError::NonPositiveDimension { name, value });
            }
        }

        for (name, value) in [
            ("board_width", self.board_width),
            ("board_height", self.board_height),
        ] {
            if value % self.cell_size != 0 {
                return Err(ConfigError::CellSizeMismatch {
                    name,
                    value,
                    cell_size: self.cell_size,
                });
            }
        }

        let cells = self.grid().cell_count();
        if cells < 2 {
            return Err(ConfigError::BoardTooSmall { cells });
        }

        for (name, value) in [
            ("tick_interval_seconds", self.tick_interval_seconds),
            ("direction_cooldown_seconds", self.direction_cooldown_seconds),
        ] {
            if Duration::try_from_secs_f64(value).is_err() {
                return Err(ConfigError::InvalidDuration { name, value });
            }
        }

        if !self.dead_zone_pixels.is_finite() || self.dead_zone_pixels < 0.0 {
            return Err(ConfigError::InvalidDeadZone(self.dead_zone_pixels));
        }

        Ok(())
    }

    /// Board geometry. Only meaningful once `validate` has passed.
    pub(crate) fn grid(&self) -> Grid {
        Grid::new(self.board_width, self.board_height, self.cell_size)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.tick_interval_seconds).unwrap_or_default()
    }

    pub fn direction_cooldown(&self) -> Duration {
        Duration::try_from_secs_f64(self.direction_cooldown_seconds).unwrap_or_default()
    }
}
