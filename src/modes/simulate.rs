//! Headless mode: a jittery pointer chases the food on a simulated clock.
//!
//! Exercises the full frame pipeline (sample, resolve, tick) without a
//! terminal, restarting after every crash, and reports how the rounds went.

use std::time::Duration;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::error::EngineError;
use crate::game::{CollisionType, GameConfig, GameSession, Point, RenderModel, TickOutcome};
use crate::metrics::GameMetrics;

/// Simulated camera frame rate
const FRAME_PERIOD: Duration = Duration::from_micros(33_333);

/// Aims at the centre of the food cell, off by up to `jitter` on each axis
pub struct FoodSeeker {
    rng: StdRng,
    jitter: f64,
}

impl FoodSeeker {
    pub fn new(seed: u64, jitter: f64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            jitter: jitter.abs(),
        }
    }

    pub fn aim(&mut self, model: &RenderModel) -> Option<Point> {
        if model.game_over {
            return None;
        }
        let half = f64::from(model.cell_size) / 2.0;
        let (jx, jy) = if self.jitter > 0.0 {
            (
                self.rng.gen_range(-self.jitter..=self.jitter),
                self.rng.gen_range(-self.jitter..=self.jitter),
            )
        } else {
            (0.0, 0.0)
        };
        Some(Point::new(
            f64::from(model.food.x) + half + jx,
            f64::from(model.food.y) + half + jy,
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationSummary {
    pub frames: u64,
    pub steps: u64,
    pub rounds: u32,
    pub food_eaten: u32,
    pub turns: u32,
    pub best_score: u32,
    pub longest_snake: usize,
    pub wall_crashes: u32,
    pub self_crashes: u32,
}

impl SimulationSummary {
    pub fn format_summary(&self) -> String {
        format!(
            "frames {} | steps {} | rounds {} | food {} | turns {} | best {} | longest {} | crashes wall/self {}/{}",
            self.frames,
            self.steps,
            self.rounds,
            self.food_eaten,
            self.turns,
            self.best_score,
            self.longest_snake,
            self.wall_crashes,
            self.self_crashes,
        )
    }
}

pub struct SimulateMode {
    session: GameSession,
    seeker: FoodSeeker,
    metrics: GameMetrics,
    frames: u64,
}

impl SimulateMode {
    pub fn new(config: GameConfig, frames: u64) -> Result<Self> {
        let seed = config.seed.unwrap_or_default();
        let jitter = config.dead_zone_pixels / 2.0;
        let session = GameSession::new(config).context("Invalid game configuration")?;

        Ok(Self {
            session,
            seeker: FoodSeeker::new(seed, jitter),
            metrics: GameMetrics::new(),
            frames,
        })
    }

    pub fn run(&mut self) -> Result<SimulationSummary> {
        let mut summary = SimulationSummary {
            rounds: 1,
            ..Default::default()
        };
        let mut now = Duration::ZERO;

        for _ in 0..self.frames {
            now += FRAME_PERIOD;
            summary.frames += 1;

            let sample = self.seeker.aim(&self.session.render_model());
            let report = match self.session.on_frame(sample, now) {
                Ok(report) => report,
                Err(EngineError::BoardFull) => {
                    warn!("board full, starting a new round");
                    self.end_round(&mut summary, now)?;
                    continue;
                }
                Err(err) => return Err(err).context("Simulation step failed"),
            };

            if report.turned.is_some() {
                summary.turns += 1;
            }
            if report.outcome.is_step() {
                summary.steps += 1;
            }

            match report.outcome {
                TickOutcome::Moved { ate_food: true } => {
                    summary.food_eaten += 1;
                    debug!(
                        score = self.session.engine().current_score(),
                        "seeker reached food"
                    );
                }
                TickOutcome::GameOver(kind) => {
                    match kind {
                        CollisionType::Wall => summary.wall_crashes += 1,
                        CollisionType::SelfCollision => summary.self_crashes += 1,
                    }
                    self.end_round(&mut summary, now)?;
                }
                _ => {}
            }
        }

        summary.best_score = self.metrics.best_with(self.session.engine().current_score());
        summary.longest_snake = self
            .metrics
            .longest_snake
            .max(self.session.engine().snake_length());
        info!(summary = %summary.format_summary(), "simulation finished");
        Ok(summary)
    }

    fn end_round(&mut self, summary: &mut SimulationSummary, now: Duration) -> Result<()> {
        let engine = self.session.engine();
        info!(
            round = summary.rounds,
            score = engine.current_score(),
            length = engine.snake_length(),
            "round over"
        );
        self.metrics
            .on_game_over(engine.current_score(), engine.snake_length());
        self.session.reset(now).context("Failed to reset game")?;
        summary.rounds += 1;
        Ok(())
    }
}
