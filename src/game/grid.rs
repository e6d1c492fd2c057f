//! Board geometry: the grid, aligned cell positions and raw frame points

use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// A grid-aligned position on the board, in board units (multiples of the cell size)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move one cell in a direction
    pub fn stepped(&self, direction: Direction, cell_size: i32) -> Self {
        let (dx, dy) = direction.delta(cell_size);
        self.moved_by(dx, dy)
    }
}

/// A point in the signal source's frame coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Scale between the signal source's frame and the board
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMapping {
    scale_x: f64,
    scale_y: f64,
}

impl FrameMapping {
    /// Frame and board share one coordinate space
    pub fn identity() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// Map a board of `grid` onto a frame of `frame_width` x `frame_height`.
    /// Non-positive frame sizes fall back to the identity mapping.
    pub fn for_frame(grid: &Grid, frame_width: f64, frame_height: f64) -> Self {
        if !(frame_width > 0.0 && frame_height > 0.0) {
            return Self::identity();
        }
        Self {
            scale_x: frame_width / f64::from(grid.width()),
            scale_y: frame_height / f64::from(grid.height()),
        }
    }

    /// Board position expressed in frame coordinates
    pub fn to_frame(&self, pos: Position) -> Point {
        Point::new(
            f64::from(pos.x) * self.scale_x,
            f64::from(pos.y) * self.scale_y,
        )
    }
}

impl Default for FrameMapping {
    fn default() -> Self {
        Self::identity()
    }
}

/// Board dimensions. Built only from a validated `GameConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    cell_size: i32,
}

impl Grid {
    pub(crate) fn new(width: i32, height: i32, cell_size: i32) -> Self {
        Self {
            width,
            height,
            cell_size,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    pub fn columns(&self) -> i32 {
        self.width / self.cell_size
    }

    pub fn rows(&self) -> i32 {
        self.height / self.cell_size
    }

    pub fn cell_count(&self) -> usize {
        (self.columns() as usize) * (self.rows() as usize)
    }

    /// Check if a position is within [0, W) x [0, H)
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    pub fn is_aligned(&self, pos: Position) -> bool {
        pos.x % self.cell_size == 0 && pos.y % self.cell_size == 0
    }

    /// In bounds and on a cell boundary
    pub fn is_valid(&self, pos: Position) -> bool {
        self.contains(pos) && self.is_aligned(pos)
    }

    /// Centre cell, snapped down to the grid
    pub fn center(&self) -> Position {
        Position::new(
            self.columns() / 2 * self.cell_size,
            self.rows() / 2 * self.cell_size,
        )
    }

    /// Every cell on the board, row by row
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        let cell = self.cell_size;
        (0..self.rows()).flat_map(move |row| {
            (0..self.columns()).map(move |col| Position::new(col * cell, row * cell))
        })
    }
}
