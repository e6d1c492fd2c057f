//! Gesture Snake - a grid snake steered by a continuous pointer signal
//!
//! This library provides:
//! - Core simulation and pointer-to-direction resolution (game module)
//! - Pointer sources and terminal input (input module)
//! - TUI rendering from a read-only render model (render module)
//! - Interactive and headless execution modes (modes module)

pub mod error;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;

pub use error::{ConfigError, EngineError};
