//! Error types for configuration and engine operations

use std::path::PathBuf;

use thiserror::Error;

use crate::game::Position;

/// Configuration rejected at construction time
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    NonPositiveDimension { name: &'static str, value: i32 },

    #[error("cell size {cell_size} does not divide {name} {value}")]
    CellSizeMismatch {
        name: &'static str,
        value: i32,
        cell_size: i32,
    },

    #[error("board of {cells} cell(s) leaves no room for food")]
    BoardTooSmall { cells: usize },

    #[error("{name} must be a finite, non-negative number of seconds, got {value}")]
    InvalidDuration { name: &'static str, value: f64 },

    #[error("dead zone must be finite and non-negative, got {0}")]
    InvalidDeadZone(f64),

    #[error("failed to read config file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Engine operation failures. None of these leave the engine half-updated.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no free cell left for food")]
    BoardFull,

    #[error("position ({}, {}) is off the board or not grid-aligned", .0.x, .0.y)]
    InvalidPosition(Position),

    #[error("position ({}, {}) is occupied by the snake", .0.x, .0.y)]
    Occupied(Position),

    #[error("invalid snake: {0}")]
    InvalidSnake(String),
}
