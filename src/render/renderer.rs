use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{Cell, GameOverReason, GameStatus, Position, Snapshot};
use crate::metrics::GameMetrics;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &Snapshot, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        // Render header with basic stats
        let stats = self.render_stats(snapshot, metrics);
        frame.render_widget(stats, chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        let grid = self.render_grid(snapshot);
        frame.render_widget(grid, game_area);

        // Overlay a prompt for every phase other than live play
        if let Some(overlay) = self.render_overlay(snapshot, metrics) {
            let popup = centered_rect(game_area, 40, 9);
            frame.render_widget(Clear, popup);
            frame.render_widget(overlay, popup);
        }

        // Render footer with controls
        let controls = self.render_controls(snapshot.status);
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, snapshot: &Snapshot) -> Paragraph<'static> {
        let lines: Vec<Line> = snapshot
            .grid
            .iter_rows()
            .enumerate()
            .map(|(row, cells)| {
                let spans: Vec<Span> = cells
                    .iter()
                    .enumerate()
                    .map(|(col, cell)| {
                        let is_head = Position::new(row as i32, col as i32) == snapshot.head;
                        cell_span(*cell, is_head)
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, snapshot: &Snapshot, metrics: &GameMetrics) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(snapshot.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.best_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(format!("{}ms", snapshot.speed_ms), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_overlay(
        &self,
        snapshot: &Snapshot,
        metrics: &GameMetrics,
    ) -> Option<Paragraph<'static>> {
        let key = |k: &'static str| {
            Span::styled(
                k,
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
        };
        let gray = Style::default().fg(Color::Gray);

        let (title, color, body) = match snapshot.status {
            GameStatus::Running => return None,
            GameStatus::NotStarted => (
                "SNAKE",
                Color::Cyan,
                vec![Line::from(vec![
                    Span::styled("Press ", gray),
                    key("Enter"),
                    Span::styled(" to start", gray),
                ])],
            ),
            GameStatus::Paused => (
                "PAUSED",
                Color::Yellow,
                vec![Line::from(vec![
                    Span::styled("Press ", gray),
                    key("Space"),
                    Span::styled(" to resume", gray),
                ])],
            ),
            GameStatus::GameOver => (
                game_over_title(snapshot.game_over_reason),
                Color::Red,
                vec![
                    Line::from(vec![
                        Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                        Span::styled(
                            snapshot.score.to_string(),
                            Style::default()
                                .fg(Color::White)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(
                            format!("   Games: {}", metrics.games_played),
                            gray,
                        ),
                    ]),
                    Line::from(""),
                    Line::from(vec![
                        Span::styled("Press ", gray),
                        key("R"),
                        Span::styled(" to play again or ", gray),
                        Span::styled(
                            "Q",
                            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(" to quit", gray),
                    ]),
                ],
            ),
        };

        let mut text = vec![
            Line::from(""),
            Line::from(Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        text.extend(body);

        Some(
            Paragraph::new(text).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            ),
        )
    }

    fn render_controls(&self, status: GameStatus) -> Paragraph<'static> {
        let pause_hint = match status {
            GameStatus::Paused => " to resume | ",
            _ => " to pause | ",
        };

        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(pause_hint),
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

fn cell_span(cell: Cell, is_head: bool) -> Span<'static> {
    match cell {
        Cell::Snake if is_head => Span::styled(
            "■ ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Cell::Snake => Span::styled("□ ", Style::default().fg(Color::Green)),
        Cell::Food => Span::styled(
            "O ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Cell::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
    }
}

fn game_over_title(reason: Option<GameOverReason>) -> &'static str {
    match reason {
        Some(GameOverReason::BoardFull) => "BOARD CLEARED",
        Some(GameOverReason::SelfCollision) => "GAME OVER - BIT YOURSELF",
        Some(GameOverReason::Wall) => "GAME OVER - HIT THE WALL",
        None => "GAME OVER",
    }
}

/// A `width` x `height` rectangle centred in `area`, clamped to fit
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
