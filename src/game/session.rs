//! One game session: the resolver feeding the engine, frame by frame

use std::time::Duration;

use tracing::debug;

use super::{
    config::GameConfig,
    direction::Direction,
    engine::{GameEngine, TickOutcome},
    grid::{FrameMapping, Point},
    render_model::RenderModel,
    resolver::DirectionResolver,
};
use crate::error::EngineError;

/// What happened while processing one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    /// Direction queued for the next step, if the sample changed it
    pub turned: Option<Direction>,
    pub outcome: TickOutcome,
}

/// Owns the engine and its resolver. Hosts hold this by value or behind a
/// single lock; every frame goes through `on_frame`.
pub struct GameSession {
    engine: GameEngine,
    resolver: DirectionResolver,
    mapping: FrameMapping,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Result<Self, EngineError> {
        let resolver = DirectionResolver::from_config(&config);
        let engine = GameEngine::new(config)?;
        Ok(Self::from_engine(engine, resolver))
    }

    pub fn from_engine(engine: GameEngine, resolver: DirectionResolver) -> Self {
        Self {
            engine,
            resolver,
            mapping: FrameMapping::identity(),
        }
    }

    /// Use when the signal source's frame is not the board's coordinate space
    pub fn with_mapping(mut self, mapping: FrameMapping) -> Self {
        self.mapping = mapping;
        self
    }

    /// Resolve the frame's pointer sample into a pending direction, then
    /// give the engine its (rate limited) tick.
    pub fn on_frame(
        &mut self,
        sample: Option<Point>,
        now: Duration,
    ) -> Result<FrameReport, EngineError> {
        let mut turned = None;

        if !self.engine.is_over() {
            let head = self.mapping.to_frame(self.engine.head());
            let current = self.engine.direction();
            let queued = self.engine.pending_direction();
            match self.resolver.resolve_queued(sample, head, current, queued, now) {
                Some(direction) if direction == current => {
                    debug!(?direction, ?queued, "pointer cancelled the queued turn");
                    self.engine.clear_pending_direction();
                    turned = Some(direction);
                }
                Some(direction) => {
                    if self.engine.set_pending_direction(direction) {
                        debug!(?direction, ?current, "pointer turned the snake");
                        turned = Some(direction);
                    }
                }
                None => {}
            }
        }

        let outcome = self.engine.tick(now)?;
        Ok(FrameReport { turned, outcome })
    }

    /// Restart the game and forget the resolver's cooldown
    pub fn reset(&mut self, now: Duration) -> Result<(), EngineError> {
        self.engine.reset(now)?;
        self.resolver.reset();
        Ok(())
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut GameEngine {
        &mut self.engine
    }

    pub fn resolver(&self) -> &DirectionResolver {
        &self.resolver
    }

    pub fn render_model(&self) -> RenderModel {
        self.engine.render_model()
    }
}
