//! Terminal input and pointer signal sources

pub mod handler;
pub mod pointer;

pub use handler::{InputAction, InputHandler};
pub use pointer::{MousePointer, PointerSource, ScriptedPointer};
