//! Read-only projection of engine state for presentation layers

use serde::Serialize;

use super::engine::GameEngine;
use super::grid::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CellKind {
    Head,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SnakeCell {
    pub position: Position,
    pub kind: CellKind,
}

/// Owned snapshot: holding one never borrows or mutates the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderModel {
    pub board_width: i32,
    pub board_height: i32,
    pub cell_size: i32,
    /// Head first
    pub snake: Vec<SnakeCell>,
    pub food: Position,
    pub score: u32,
    pub game_over: bool,
}

impl RenderModel {
    pub fn capture(engine: &GameEngine) -> Self {
        let grid = engine.grid();
        let snake = engine
            .snake()
            .segments()
            .enumerate()
            .map(|(i, position)| SnakeCell {
                position,
                kind: if i == 0 { CellKind::Head } else { CellKind::Body },
            })
            .collect();

        Self {
            board_width: grid.width(),
            board_height: grid.height(),
            cell_size: grid.cell_size(),
            snake,
            food: engine.food(),
            score: engine.current_score(),
            game_over: engine.is_over(),
        }
    }

    pub fn columns(&self) -> i32 {
        self.board_width / self.cell_size
    }

    pub fn rows(&self) -> i32 {
        self.board_height / self.cell_size
    }

    pub fn head(&self) -> Option<Position> {
        self.snake.first().map(|cell| cell.position)
    }

    pub fn snake_length(&self) -> usize {
        self.snake.len()
    }

    /// What occupies the cell at column/row, if anything
    pub fn cell_at(&self, column: i32, row: i32) -> Option<CellKind> {
        let pos = Position::new(column * self.cell_size, row * self.cell_size);
        self.snake
            .iter()
            .find(|cell| cell.position == pos)
            .map(|cell| cell.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameConfig};
    use std::time::Duration;

    #[test]
    fn test_capture_marks_head() {
        let engine = GameEngine::from_parts(
            GameConfig::new(100, 100, 20).with_seed(1),
            vec![Position::new(40, 40), Position::new(20, 40)],
            Direction::Right,
            Position::new(80, 0),
        )
        .unwrap();

        let model = engine.render_model();

        assert_eq!(model.columns(), 5);
        assert_eq!(model.rows(), 5);
        assert_eq!(model.head(), Some(Position::new(40, 40)));
        assert_eq!(model.snake_length(), 2);
        assert_eq!(model.cell_at(2, 2), Some(CellKind::Head));
        assert_eq!(model.cell_at(1, 2), Some(CellKind::Body));
        assert_eq!(model.cell_at(0, 0), None);
        assert_eq!(model.food, Position::new(80, 0));
        assert!(!model.game_over);
    }

    #[test]
    fn test_snapshot_is_detached_from_engine() {
        let mut engine = GameEngine::new(GameConfig::default().with_seed(2)).unwrap();
        engine.set_food(Position::new(0, 0)).unwrap();
        let mut model = engine.render_model();

        model.snake.clear();
        model.score = 999;

        assert_eq!(engine.snake_length(), 1);
        assert_eq!(engine.current_score(), 0);

        engine.tick(Duration::from_millis(120)).unwrap();
        assert_ne!(engine.render_model().head(), Some(Position::new(320, 240)));
    }
}
