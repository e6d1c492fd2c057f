use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use super::clock::SessionClock;
use crate::error::EngineError;
use crate::game::{GameConfig, GameSession, TickOutcome};
use crate::input::{InputAction, InputHandler, MousePointer, PointerSource};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Frames per second of the pointer signal; ticks are rate limited separately
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Interactive terminal game steered with the mouse
pub struct PlayMode {
    session: GameSession,
    clock: SessionClock,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    pointer: MousePointer,
    /// The snake filled the board; frames stop until restart
    board_full: bool,
    round_recorded: bool,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let cell_size = config.cell_size;
        let session = GameSession::new(config).context("Invalid game configuration")?;

        Ok(Self {
            session,
            clock: SessionClock::start(),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            pointer: MousePointer::new(cell_size),
            board_full: false,
            round_recorded: false,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // The engine clock started at construction; line it up with ours
        self.reset_game()?;
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut frame_timer = interval(FRAME_INTERVAL);

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                // One frame: sample the pointer, let the session tick, draw
                _ = frame_timer.tick() => {
                    self.process_frame()?;
                    let model = self.session.render_model();
                    self.metrics.update(model.game_over || self.board_full);

                    let mut board_area = None;
                    terminal.draw(|frame| {
                        board_area = Some(self.renderer.render(
                            frame,
                            &model,
                            &self.metrics,
                            self.board_full,
                        ));
                    }).context("Failed to draw frame")?;
                    if let Some(area) = board_area {
                        self.pointer.set_board_area(area);
                    }
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        match self.input_handler.handle_event(event) {
            InputAction::Pointer { column, row } => self.pointer.record(column, row),
            InputAction::Restart => self.reset_game()?,
            InputAction::Quit => self.should_quit = true,
            InputAction::None => {}
        }
        Ok(())
    }

    fn process_frame(&mut self) -> Result<()> {
        let now = self.clock.now();
        self.process_frame_at(now)
    }

    fn process_frame_at(&mut self, now: Duration) -> Result<()> {
        if self.board_full {
            return Ok(());
        }
        let sample = self.pointer.next_sample();

        match self.session.on_frame(sample, now) {
            Ok(report) => {
                if let TickOutcome::GameOver(kind) = report.outcome {
                    info!(?kind, score = self.session.engine().current_score(), "round lost");
                    self.record_round();
                }
                Ok(())
            }
            // Snake fills the board: nothing left to eat, the round ends
            Err(EngineError::BoardFull) => {
                warn!(
                    score = self.session.engine().current_score(),
                    length = self.session.engine().snake_length(),
                    "board full, round finished"
                );
                self.board_full = true;
                self.record_round();
                Ok(())
            }
            Err(err) => Err(err).context("Game step failed"),
        }
    }

    fn record_round(&mut self) {
        if self.round_recorded {
            return;
        }
        let engine = self.session.engine();
        self.metrics
            .on_game_over(engine.current_score(), engine.snake_length());
        self.round_recorded = true;
    }

    fn reset_game(&mut self) -> Result<()> {
        if self.session.engine().steps() > 0 {
            self.record_round();
        }
        self.session
            .reset(self.clock.now())
            .context("Failed to reset game")?;
        self.metrics.on_game_start();
        self.pointer.clear();
        self.board_full = false;
        self.round_recorded = false;
        Ok(())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
