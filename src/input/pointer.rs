//! Pointer signal sources
//!
//! A source yields at most one pointer position per frame, in its own frame
//! coordinates, or nothing when no pointer is visible.

use std::collections::VecDeque;

use ratatui::layout::Rect;

use crate::game::Point;

/// Per-frame pointer signal, e.g. a tracked fingertip
pub trait PointerSource {
    fn next_sample(&mut self) -> Option<Point>;
}

/// Replays a fixed list of samples, then reports no signal
#[derive(Debug, Clone, Default)]
pub struct ScriptedPointer {
    samples: VecDeque<Option<Point>>,
}

impl ScriptedPointer {
    pub fn new(samples: impl IntoIterator<Item = Option<Point>>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
        }
    }

    /// The same sample for `frames` frames
    pub fn hold(sample: Option<Point>, frames: usize) -> Self {
        Self::new(std::iter::repeat_n(sample, frames))
    }

    pub fn push(&mut self, sample: Option<Point>) {
        self.samples.push_back(sample);
    }

    pub fn remaining(&self) -> usize {
        self.samples.len()
    }
}

impl PointerSource for ScriptedPointer {
    fn next_sample(&mut self) -> Option<Point> {
        self.samples.pop_front().flatten()
    }
}

/// Terminal mouse as the pointer. Maps terminal cells onto the board drawn
/// at `board_area`, two columns per board cell.
#[derive(Debug, Clone)]
pub struct MousePointer {
    cell_size: i32,
    board_area: Option<Rect>,
    latest: Option<(u16, u16)>,
}

impl MousePointer {
    pub fn new(cell_size: i32) -> Self {
        Self {
            cell_size,
            board_area: None,
            latest: None,
        }
    }

    /// Where the renderer last drew the board (inside its border)
    pub fn set_board_area(&mut self, area: Rect) {
        self.board_area = Some(area);
    }

    pub fn record(&mut self, column: u16, row: u16) {
        self.latest = Some((column, row));
    }

    /// Drop the pointer, e.g. after a restart
    pub fn clear(&mut self) {
        self.latest = None;
    }

    /// Centre of the board cell under the terminal position. Positions
    /// outside the board map past its edges rather than being dropped.
    fn to_frame(&self, column: u16, row: u16, area: Rect) -> Point {
        let cell = f64::from(self.cell_size);
        let board_col = (f64::from(column) - f64::from(area.x)) / 2.0;
        let board_row = f64::from(row) - f64::from(area.y);
        Point::new(
            board_col.floor() * cell + cell / 2.0,
            board_row * cell + cell / 2.0,
        )
    }
}

impl PointerSource for MousePointer {
    fn next_sample(&mut self) -> Option<Point> {
        let (column, row) = self.latest?;
        let area = self.board_area?;
        Some(self.to_frame(column, row, area))
    }
}
