//! Core game logic module for Snake
//!
//! Simulation and pointer resolution without any I/O or rendering
//! dependencies. Hosts drive it through `GameSession::on_frame` and draw from
//! the `RenderModel` snapshot.

pub mod config;
pub mod direction;
pub mod engine;
pub mod grid;
pub mod render_model;
pub mod resolver;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use config::GameConfig;
pub use direction::Direction;
pub use engine::{GameEngine, TickOutcome};
pub use grid::{FrameMapping, Grid, Point, Position};
pub use render_model::{CellKind, RenderModel, SnakeCell};
pub use resolver::DirectionResolver;
pub use session::{FrameReport, GameSession};
pub use state::{CollisionType, GameStatus, Snake};
