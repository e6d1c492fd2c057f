use std::collections::HashMap;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{CellKind, Position, RenderModel};
use crate::metrics::GameMetrics;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Draw one frame. Returns the board's inner area so pointer input can be
    /// mapped back onto cells.
    ///
    /// `board_full` marks a round that ended because no cell was left for food.
    pub fn render(
        &self,
        frame: &mut Frame,
        model: &RenderModel,
        metrics: &GameMetrics,
        board_full: bool,
    ) -> Rect {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(model, metrics), chunks[0]);

        let board = Self::board_rect(chunks[1], model);
        frame.render_widget(self.render_grid(model), board);

        if model.game_over || board_full {
            let popup = Self::centered(board, 30, 7);
            frame.render_widget(Clear, popup);
            frame.render_widget(self.render_round_end(model, board_full), popup);
        }

        frame.render_widget(self.render_controls(), chunks[2]);

        Rect::new(
            board.x + 1,
            board.y + 1,
            board.width.saturating_sub(2),
            board.height.saturating_sub(2),
        )
    }

    /// Two terminal columns per cell plus the border, centred in `area`
    fn board_rect(area: Rect, model: &RenderModel) -> Rect {
        let columns = u16::try_from(model.columns()).unwrap_or(u16::MAX);
        let rows = u16::try_from(model.rows()).unwrap_or(u16::MAX);
        let width = columns.saturating_mul(2).saturating_add(2);
        let height = rows.saturating_add(2);
        Self::centered(area, width, height)
    }

    fn centered(area: Rect, width: u16, height: u16) -> Rect {
        let width = width.min(area.width);
        let height = height.min(area.height);
        Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        )
    }

    fn render_grid(&self, model: &RenderModel) -> Paragraph<'_> {
        let occupied: HashMap<Position, CellKind> = model
            .snake
            .iter()
            .map(|cell| (cell.position, cell.kind))
            .collect();
        let cell_size = model.cell_size;

        let lines: Vec<Line> = (0..model.rows())
            .map(|row| {
                let spans: Vec<Span> = (0..model.columns())
                    .map(|col| {
                        let pos = Position::new(col * cell_size, row * cell_size);
                        match occupied.get(&pos) {
                            Some(CellKind::Head) => Span::styled(
                                "■ ",
                                Style::default()
                                    .fg(Color::Cyan)
                                    .add_modifier(Modifier::BOLD),
                            ),
                            Some(CellKind::Body) => {
                                Span::styled("□ ", Style::default().fg(Color::Green))
                            }
                            None if pos == model.food => Span::styled(
                                "● ",
                                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                            ),
                            None => Span::styled(". ", Style::default().fg(Color::DarkGray)),
                        }
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        let border = if model.game_over {
            Color::Red
        } else {
            Color::White
        };

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(border))
                .title(" Snake "),
        )
    }

    fn render_stats(&self, model: &RenderModel, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(model.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("High Score: ", label),
            Span::styled(metrics.best_with(model.score).to_string(), value),
            Span::raw("    "),
            Span::styled("Length: ", label),
            Span::styled(model.snake_length().to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_round_end(&self, model: &RenderModel, board_full: bool) -> Paragraph<'_> {
        let (title, color) = if board_full {
            ("BOARD FULL!", Color::Green)
        } else {
            ("GAME OVER!", Color::Red)
        };
        let text = vec![
            Line::from(vec![Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    model.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("R", Style::default().fg(Color::Green)),
                Span::styled(" restart  ", Style::default().fg(Color::Gray)),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::styled(" quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::raw("Point with the "),
            Span::styled("mouse", Style::default().fg(Color::Cyan)),
            Span::raw(" to steer | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
