use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use tracing::{debug, info, warn};

use super::{
    config::GameConfig,
    direction::Direction,
    grid::{Grid, Position},
    render_model::RenderModel,
    state::{CollisionType, GameStatus, Snake},
};
use crate::error::EngineError;

/// What a call to `tick` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick interval has not elapsed yet
    NotDue,
    /// The game is over; nothing happens until reset
    Halted,
    /// The snake advanced one cell
    Moved { ate_food: bool },
    /// The snake crashed this tick
    GameOver(CollisionType),
}

impl TickOutcome {
    /// Whether this call changed the simulation state
    pub fn is_step(&self) -> bool {
        matches!(self, TickOutcome::Moved { .. } | TickOutcome::GameOver(_))
    }
}

/// The authoritative simulation, stepped on a fixed wall-clock interval
pub struct GameEngine {
    config: GameConfig,
    grid: Grid,
    tick_interval: Duration,
    snake: Snake,
    direction: Direction,
    pending: Option<Direction>,
    food: Position,
    score: u32,
    status: GameStatus,
    collision: Option<CollisionType>,
    steps: u64,
    last_tick: Duration,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration.
    ///
    /// The tick clock starts at `Duration::ZERO`.
    pub fn new(config: GameConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let grid = config.grid();
        let mut engine = Self::blank(config, Snake::new(grid.center()));
        engine.reset(Duration::ZERO)?;
        Ok(engine)
    }

    /// Rebuild an engine around an existing board, e.g. a saved scenario.
    ///
    /// Segments are head first and must be on-board, grid-aligned, distinct
    /// and one step apart. `direction` may not point back into the neck.
    pub fn from_parts(
        config: GameConfig,
        segments: Vec<Position>,
        direction: Direction,
        food: Position,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let grid = config.grid();

        if let Some(bad) = segments.iter().find(|&&pos| !grid.is_valid(pos)) {
            return Err(EngineError::InvalidPosition(*bad));
        }
        for pair in segments.windows(2) {
            let adjacent = Direction::ALL
                .iter()
                .any(|&d| pair[0].stepped(d, grid.cell_size()) == pair[1]);
            if !adjacent {
                return Err(EngineError::InvalidSnake(format!(
                    "segments ({}, {}) and ({}, {}) are not adjacent",
                    pair[0].x, pair[0].y, pair[1].x, pair[1].y
                )));
            }
        }
        if let [head, neck, ..] = segments.as_slice() {
            if head.stepped(direction, grid.cell_size()) == *neck {
                return Err(EngineError::InvalidSnake(format!(
                    "heading {direction:?} points back into the body"
                )));
            }
        }

        let snake = Snake::from_segments(segments).ok_or_else(|| {
            EngineError::InvalidSnake("snake must be non-empty without repeated cells".into())
        })?;

        let mut engine = Self::blank(config, snake);
        engine.direction = direction;
        engine.set_food(food)?;
        Ok(engine)
    }

    fn blank(config: GameConfig, snake: Snake) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let head = snake.head();

        Self {
            grid: config.grid(),
            tick_interval: config.tick_interval(),
            config,
            snake,
            direction: Direction::Right,
            pending: None,
            food: head,
            score: 0,
            status: GameStatus::Running,
            collision: None,
            steps: 0,
            last_tick: Duration::ZERO,
            rng,
        }
    }

    /// Start a fresh game: one segment at the centre heading right, score 0,
    /// new food, and the tick clock re-armed at `now`.
    ///
    /// Can only fail on a board without a free cell, which a validated
    /// config rules out.
    pub fn reset(&mut self, now: Duration) -> Result<(), EngineError> {
        let snake = Snake::new(self.grid.center());
        let food = Self::pick_free_cell(self.grid, &mut self.rng, &snake, None)?;

        self.snake = snake;
        self.food = food;
        self.direction = Direction::Right;
        self.pending = None;
        self.score = 0;
        self.status = GameStatus::Running;
        self.collision = None;
        self.steps = 0;
        self.last_tick = now;

        info!(head = ?self.snake.head(), food = ?self.food, "game reset");
        Ok(())
    }

    /// Queue the heading for the next tick, replacing any unconsumed one.
    ///
    /// Ignored (returns false) while the game is over or when `direction`
    /// reverses the heading currently applied.
    pub fn set_pending_direction(&mut self, direction: Direction) -> bool {
        if self.status == GameStatus::Over {
            return false;
        }
        if direction.is_opposite(self.direction) {
            warn!(?direction, current = ?self.direction, "reversal ignored");
            return false;
        }
        self.pending = Some(direction);
        true
    }

    /// Drop the queued heading; the next step keeps the current one
    pub fn clear_pending_direction(&mut self) {
        self.pending = None;
    }

    /// Advance one step if at least one tick interval has passed since the
    /// last step. Safe to call every frame.
    ///
    /// On `Err` nothing has changed: the only failure is a full board when
    /// the snake eats, in which case the step is not taken.
    pub fn tick(&mut self, now: Duration) -> Result<TickOutcome, EngineError> {
        if self.status == GameStatus::Over {
            return Ok(TickOutcome::Halted);
        }
        if now.saturating_sub(self.last_tick) < self.tick_interval {
            return Ok(TickOutcome::NotDue);
        }

        let direction = match self.pending {
            Some(pending) if !pending.is_opposite(self.direction) => pending,
            _ => self.direction,
        };
        let new_head = self.snake.head().stepped(direction, self.grid.cell_size());
        let ate_food = new_head == self.food;

        let collision = if !self.grid.contains(new_head) {
            Some(CollisionType::Wall)
        } else if self.snake.collides(new_head, ate_food) {
            Some(CollisionType::SelfCollision)
        } else {
            None
        };

        if let Some(kind) = collision {
            self.commit_heading(direction, now);
            self.status = GameStatus::Over;
            self.collision = Some(kind);
            info!(?kind, score = self.score, length = self.snake.len(), "game over");
            return Ok(TickOutcome::GameOver(kind));
        }

        let next_food = if ate_food {
            Some(Self::pick_free_cell(
                self.grid,
                &mut self.rng,
                &self.snake,
                Some(new_head),
            )?)
        } else {
            None
        };

        self.commit_heading(direction, now);
        self.snake.advance(new_head, ate_food);

        if let Some(food) = next_food {
            self.score += self.config.food_reward;
            self.food = food;
            debug!(score = self.score, length = self.snake.len(), next = ?food, "food eaten");
        }

        Ok(TickOutcome::Moved { ate_food })
    }

    fn commit_heading(&mut self, direction: Direction, now: Duration) {
        if direction != self.direction {
            debug!(from = ?self.direction, to = ?direction, "heading changed");
        }
        self.direction = direction;
        self.pending = None;
        self.last_tick = now;
        self.steps += 1;
    }

    /// Move the food to a uniformly random free cell
    pub fn place_food(&mut self) -> Result<Position, EngineError> {
        if self.status == GameStatus::Over {
            return Ok(self.food);
        }
        let food = Self::pick_free_cell(self.grid, &mut self.rng, &self.snake, None)?;
        self.food = food;
        Ok(food)
    }

    /// Put the food on a chosen cell
    pub fn set_food(&mut self, pos: Position) -> Result<(), EngineError> {
        if self.status == GameStatus::Over {
            return Ok(());
        }
        if !self.grid.is_valid(pos) {
            return Err(EngineError::InvalidPosition(pos));
        }
        if self.snake.contains(pos) {
            return Err(EngineError::Occupied(pos));
        }
        self.food = pos;
        Ok(())
    }

    /// Uniform choice over cells not covered by `snake` (nor `extra`)
    fn pick_free_cell(
        grid: Grid,
        rng: &mut StdRng,
        snake: &Snake,
        extra: Option<Position>,
    ) -> Result<Position, EngineError> {
        grid.cells()
            .filter(|&cell| !snake.contains(cell) && Some(cell) != extra)
            .choose(rng)
            .ok_or_else(|| {
                warn!(length = snake.len(), "no free cell for food");
                EngineError::BoardFull
            })
    }

    /// Read-only snapshot for a renderer
    pub fn render_model(&self) -> RenderModel {
        RenderModel::capture(self)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn head(&self) -> Position {
        self.snake.head()
    }

    pub fn food(&self) -> Position {
        self.food
    }

    /// Heading applied on the most recent step
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn collision(&self) -> Option<CollisionType> {
        self.collision
    }

    pub fn current_score(&self) -> u32 {
        self.score
    }

    pub fn is_over(&self) -> bool {
        self.status == GameStatus::Over
    }

    pub fn snake_length(&self) -> usize {
        self.snake.len()
    }

    /// Steps taken since the last reset
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn seeded() -> GameEngine {
        GameEngine::new(GameConfig::default().with_seed(42)).unwrap()
    }

    #[test]
    fn test_reset() {
        let engine = seeded();

        assert!(!engine.is_over());
        assert_eq!(engine.current_score(), 0);
        assert_eq!(engine.steps(), 0);
        assert_eq!(engine.snake_length(), 1);
        assert_eq!(engine.head(), p(320, 240));
        assert_eq!(engine.direction(), Direction::Right);
        assert!(!engine.snake().contains(engine.food()));
        assert!(engine.grid().is_valid(engine.food()));
    }

    #[test]
    fn test_invalid_config_builds_no_engine() {
        let result = GameEngine::new(GameConfig::new(640, 470, 20));
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = seeded();
        engine.set_food(p(0, 0)).unwrap();

        let outcome = engine.tick(ms(130)).unwrap();

        assert_eq!(outcome, TickOutcome::Moved { ate_food: false });
        assert_eq!(engine.head(), p(340, 240));
        assert_eq!(engine.snake_length(), 1);
        assert_eq!(engine.steps(), 1);
    }

    #[test]
    fn test_rate_limited_ticks() {
        let mut engine = seeded();
        engine.set_food(p(0, 0)).unwrap();

        for t in 0..12 {
            assert_eq!(engine.tick(ms(t * 10)).unwrap(), TickOutcome::NotDue);
        }
        assert_eq!(engine.head(), p(320, 240));

        assert!(engine.tick(ms(130)).unwrap().is_step());
        assert_eq!(engine.tick(ms(200)).unwrap(), TickOutcome::NotDue);
        assert!(engine.tick(ms(250)).unwrap().is_step());
        assert_eq!(engine.head(), p(360, 240));
    }

    #[test]
    fn test_clock_going_backwards_is_not_due() {
        let mut engine = seeded();
        engine.reset(ms(1000)).unwrap();
        assert_eq!(engine.tick(ms(500)).unwrap(), TickOutcome::NotDue);
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = seeded();
        engine.set_food(p(340, 240)).unwrap();

        let outcome = engine.tick(ms(120)).unwrap();

        assert_eq!(outcome, TickOutcome::Moved { ate_food: true });
        assert_eq!(engine.current_score(), 10);
        assert_eq!(engine.snake_length(), 2);
        assert_eq!(
            engine.snake().segments().collect::<Vec<_>>(),
            vec![p(340, 240), p(320, 240)]
        );
        assert!(!engine.snake().contains(engine.food()));
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = GameEngine::from_parts(
            GameConfig::default().with_seed(1),
            vec![p(0, 240)],
            Direction::Left,
            p(100, 100),
        )
        .unwrap();

        let outcome = engine.tick(ms(120)).unwrap();

        assert_eq!(outcome, TickOutcome::GameOver(CollisionType::Wall));
        assert!(engine.is_over());
        assert_eq!(engine.head(), p(0, 240));

        assert_eq!(engine.tick(ms(1000)).unwrap(), TickOutcome::Halted);
        assert!(!engine.set_pending_direction(Direction::Up));
        assert!(engine.is_over());

        engine.reset(ms(1000)).unwrap();
        assert!(!engine.is_over());
        assert_eq!(engine.collision(), None);
    }

    #[test]
    fn test_self_collision() {
        // Hook-shaped body; turning up from (60,20) lands on the segment at (60,0)
        let segments = vec![p(40, 20), p(40, 0), p(60, 0), p(80, 0), p(80, 20)];
        let mut engine = GameEngine::from_parts(
            GameConfig::new(200, 200, 20).with_seed(3),
            segments,
            Direction::Down,
            p(180, 180),
        )
        .unwrap();

        assert!(engine.set_pending_direction(Direction::Right));
        assert!(engine.tick(ms(120)).unwrap().is_step());
        assert_eq!(engine.head(), p(60, 20));

        assert!(engine.set_pending_direction(Direction::Up));
        let outcome = engine.tick(ms(240)).unwrap();
        assert_eq!(outcome, TickOutcome::GameOver(CollisionType::SelfCollision));
        assert_eq!(engine.direction(), Direction::Up);
    }

    #[test]
    fn test_moving_into_vacating_tail_is_safe() {
        // 2x2 loop: head (20,20) heading up into the tail at (20,0)
        let segments = vec![p(20, 20), p(0, 20), p(0, 0), p(20, 0)];
        let mut engine = GameEngine::from_parts(
            GameConfig::new(100, 100, 20).with_seed(5),
            segments,
            Direction::Up,
            p(80, 80),
        )
        .unwrap();

        let outcome = engine.tick(ms(120)).unwrap();

        assert_eq!(outcome, TickOutcome::Moved { ate_food: false });
        assert_eq!(engine.head(), p(20, 0));
        assert_eq!(engine.snake_length(), 4);
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = seeded();
        engine.set_food(p(0, 0)).unwrap();

        assert!(!engine.set_pending_direction(Direction::Left));
        assert_eq!(engine.pending_direction(), None);

        engine.tick(ms(120)).unwrap();
        assert_eq!(engine.direction(), Direction::Right);
    }

    #[test]
    fn test_last_pending_direction_wins() {
        let mut engine = seeded();
        engine.set_food(p(0, 0)).unwrap();

        assert!(engine.set_pending_direction(Direction::Up));
        assert!(engine.set_pending_direction(Direction::Down));
        engine.tick(ms(120)).unwrap();

        assert_eq!(engine.direction(), Direction::Down);
        assert_eq!(engine.head(), p(320, 260));
        assert_eq!(engine.pending_direction(), None);
    }

    #[test]
    fn test_clear_pending_direction() {
        let mut engine = seeded();
        engine.set_food(p(0, 0)).unwrap();
        assert!(engine.set_pending_direction(Direction::Up));
        engine.clear_pending_direction();
        assert_eq!(engine.pending_direction(), None);

        engine.tick(ms(120)).unwrap();
        assert_eq!(engine.direction(), Direction::Right);
        assert_eq!(engine.head(), p(340, 240));
    }

    #[test]
    fn test_full_board_leaves_state_untouched() {
        // 3x1 board: snake covers two cells, food the third
        let mut engine = GameEngine::from_parts(
            GameConfig::new(60, 20, 20).with_seed(9),
            vec![p(20, 0), p(0, 0)],
            Direction::Right,
            p(40, 0),
        )
        .unwrap();

        let result = engine.tick(ms(120));

        assert!(matches!(result, Err(EngineError::BoardFull)));
        assert_eq!(engine.head(), p(20, 0));
        assert_eq!(engine.snake_length(), 2);
        assert_eq!(engine.current_score(), 0);
        assert_eq!(engine.food(), p(40, 0));
        assert_eq!(engine.steps(), 0);
        assert!(!engine.is_over());
    }

    #[test]
    fn test_place_food_avoids_snake() {
        let segments = vec![p(40, 0), p(20, 0), p(0, 0), p(0, 20), p(20, 20)];
        let mut engine = GameEngine::from_parts(
            GameConfig::new(60, 40, 20).with_seed(11),
            segments,
            Direction::Right,
            p(40, 20),
        )
        .unwrap();

        // Only (40,20) is free
        for _ in 0..10 {
            assert_eq!(engine.place_food().unwrap(), p(40, 20));
        }
    }

    #[test]
    fn test_set_food_validation() {
        let mut engine = seeded();
        assert!(matches!(
            engine.set_food(p(105, 100)),
            Err(EngineError::InvalidPosition(_))
        ));
        assert!(matches!(
            engine.set_food(p(640, 0)),
            Err(EngineError::InvalidPosition(_))
        ));
        assert!(matches!(
            engine.set_food(p(320, 240)),
            Err(EngineError::Occupied(_))
        ));
        assert!(engine.set_food(p(100, 100)).is_ok());
        assert_eq!(engine.food(), p(100, 100));
    }

    #[test]
    fn test_from_parts_rejects_broken_snakes() {
        let config = GameConfig::new(100, 100, 20);

        let gap = GameEngine::from_parts(
            config.clone(),
            vec![p(40, 0), p(0, 0)],
            Direction::Right,
            p(80, 80),
        );
        assert!(matches!(gap, Err(EngineError::InvalidSnake(_))));

        let into_neck = GameEngine::from_parts(
            config.clone(),
            vec![p(20, 0), p(0, 0)],
            Direction::Left,
            p(80, 80),
        );
        assert!(matches!(into_neck, Err(EngineError::InvalidSnake(_))));

        let off_board = GameEngine::from_parts(
            config.clone(),
            vec![p(100, 0)],
            Direction::Left,
            p(80, 80),
        );
        assert!(matches!(off_board, Err(EngineError::InvalidPosition(_))));

        let food_on_snake =
            GameEngine::from_parts(config, vec![p(20, 0)], Direction::Left, p(20, 0));
        assert!(matches!(food_on_snake, Err(EngineError::Occupied(_))));
    }

    #[test]
    fn test_seeded_engines_place_food_identically() {
        let a = GameEngine::new(GameConfig::default().with_seed(77)).unwrap();
        let b = GameEngine::new(GameConfig::default().with_seed(77)).unwrap();
        assert_eq!(a.food(), b.food());
    }
}
