//! Pointer-to-heading resolution
//!
//! Turns one pointer sample per frame into at most one cardinal direction
//! change, with a dead zone around the head, dominant-axis selection, no
//! reversals and a cooldown between accepted changes.

use std::time::Duration;

use tracing::trace;

use super::config::GameConfig;
use super::direction::Direction;
use super::grid::Point;

#[derive(Debug, Clone)]
pub struct DirectionResolver {
    dead_zone: f64,
    cooldown: Duration,
    last_change: Option<Duration>,
}

impl DirectionResolver {
    pub fn new(dead_zone: f64, cooldown: Duration) -> Self {
        Self {
            dead_zone,
            cooldown,
            last_change: None,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.dead_zone_pixels, config.direction_cooldown())
    }

    /// Forget the last accepted change; the next sample is not rate limited
    pub fn reset(&mut self) {
        self.last_change = None;
    }

    pub fn last_change(&self) -> Option<Duration> {
        self.last_change
    }

    /// Resolve a frame's sample against the head (in frame coordinates).
    ///
    /// Returns the new direction and records `now` as the last change, or
    /// None when the heading should stay as it is.
    pub fn resolve(
        &mut self,
        sample: Option<Point>,
        head: Point,
        current: Direction,
        now: Duration,
    ) -> Option<Direction> {
        self.resolve_queued(sample, head, current, None, now)
    }

    /// Like `resolve`, with a direction already queued for the next step.
    ///
    /// Reversals are judged against `applied`, the heading the snake is
    /// moving in. "No change" means the sample agrees with the queued
    /// direction, so pointing back at `applied` while another turn is queued
    /// returns `applied`.
    pub fn resolve_queued(
        &mut self,
        sample: Option<Point>,
        head: Point,
        applied: Direction,
        queued: Option<Direction>,
        now: Duration,
    ) -> Option<Direction> {
        let pointer = sample?;

        if let Some(last) = self.last_change {
            if now.saturating_sub(last) < self.cooldown {
                return None;
            }
        }

        let candidate = self.classify(pointer.x - head.x, pointer.y - head.y)?;

        if candidate.is_opposite(applied) {
            trace!(?candidate, ?applied, "reversal rejected");
            return None;
        }
        if candidate == queued.unwrap_or(applied) {
            return None;
        }

        self.last_change = Some(now);
        Some(candidate)
    }

    /// Dominant axis outside the dead zone, or None on ties and small offsets
    fn classify(&self, dx: f64, dy: f64) -> Option<Direction> {
        let (ax, ay) = (dx.abs(), dy.abs());

        // NaN fails every comparison below and falls through to None
        if ax > ay && ax > self.dead_zone {
            Some(if dx > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            })
        } else if ay > ax && ay > self.dead_zone {
            Some(if dy > 0.0 {
                Direction::Down
            } else {
                Direction::Up
            })
        } else {
            None
        }
    }
}

impl Default for DirectionResolver {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}
