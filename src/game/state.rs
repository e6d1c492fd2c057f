use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::grid::Position;

/// The snake body, head first, with an occupancy index kept in lockstep
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: VecDeque<Position>,
    occupied: HashSet<Position>,
}

impl Snake {
    /// A single-segment snake
    pub fn new(head: Position) -> Self {
        Self {
            body: VecDeque::from([head]),
            occupied: HashSet::from([head]),
        }
    }

    /// Build from head-first segments. Returns None for an empty list or duplicates;
    /// adjacency against the board is checked by the engine.
    pub fn from_segments(segments: impl IntoIterator<Item = Position>) -> Option<Self> {
        let body: VecDeque<Position> = segments.into_iter().collect();
        let occupied: HashSet<Position> = body.iter().copied().collect();
        if body.is_empty() || occupied.len() != body.len() {
            return None;
        }
        Some(Self { body, occupied })
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Segments from head to tail
    pub fn segments(&self) -> impl ExactSizeIterator<Item = Position> + '_ {
        self.body.iter().copied()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.occupied.contains(&pos)
    }

    /// Would moving the head onto `pos` hit the body?
    /// The tail only counts when it stays put (the snake is growing this step).
    pub fn collides(&self, pos: Position, growing: bool) -> bool {
        self.contains(pos) && (growing || pos != self.tail())
    }

    /// Prepend a new head; drop the tail unless growing
    pub(crate) fn advance(&mut self, new_head: Position, grow: bool) {
        if !grow {
            if let Some(tail) = self.body.pop_back() {
                self.occupied.remove(&tail);
            }
        }
        self.body.push_front(new_head);
        self.occupied.insert(new_head);
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false for a snake built through the public constructors
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Whether the simulation is still advancing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Running,
    Over,
}

/// Type of collision that ended the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}
