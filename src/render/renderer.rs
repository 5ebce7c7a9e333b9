use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, Widget},
};

use crate::game::{GameState, Position};
use crate::metrics::GameMetrics;
use crate::modes::game_over::{GameOverScreen, MenuItem};
use crate::modes::login::LoginScreen;
use crate::store::HighscoreEntry;

const HEAD_GLYPH: &str = "■";
const BODY_GLYPH: &str = "□";
const FOOD_GLYPH: &str = "●";

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Grid size inside the border for a terminal of `width` x `height`.
    /// The top border row doubles as the score header.
    pub fn playable_size(width: u16, height: u16) -> (usize, usize) {
        let inner = Self::board_block().inner(Rect::new(0, 0, width, height));
        (usize::from(inner.width), usize::from(inner.height))
    }

    fn board_block() -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Color::White))
    }

    pub fn render_playing(
        &self,
        frame: &mut Frame,
        state: &GameState,
        username: Option<&str>,
        metrics: &GameMetrics,
    ) {
        let area = frame.area();
        let block = Self::board_block()
            .title(self.render_header(state, username, metrics))
            .title_bottom(self.render_controls().right_aligned());
        let board_area = block.inner(area);

        frame.render_widget(block, area);
        frame.render_widget(Board { state }, board_area);
    }

    fn render_header(
        &self,
        state: &GameState,
        username: Option<&str>,
        metrics: &GameMetrics,
    ) -> Line<'static> {
        let yellow = Style::default().fg(Color::Yellow);
        Line::from(vec![
            Span::styled(
                format!(" Player: {} ", username.unwrap_or("guest")),
                yellow,
            ),
            Span::styled("| ", yellow),
            Span::styled(
                format!("Score: {} ", state.score),
                yellow.add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("| Time: {} ", metrics.format_time()), yellow),
        ])
    }

    fn render_controls(&self) -> Line<'static> {
        Line::from(vec![
            Span::styled(" ↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit "),
        ])
    }

    pub fn render_login(&self, frame: &mut Frame, screen: &LoginScreen) {
        let mut text = vec![
            Line::from(Span::styled(
                "S N A K E",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Enter your username:"),
            Line::from(vec![
                Span::styled(
                    format!(" {}", screen.input),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("_ ", Style::default().fg(Color::Gray)),
            ]),
            Line::from(""),
        ];

        match &screen.message {
            Some(message) => text.push(Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red),
            ))),
            None => text.push(Line::from("")),
        }

        if !screen.known_players.is_empty() {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(
                format!("Known players: {}", screen.known_players.join(", ")),
                Style::default().fg(Color::DarkGray),
            )));
        }

        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Green)),
            Span::raw(" to play | "),
            Span::styled("Tab", Style::default().fg(Color::Cyan)),
            Span::raw(" for known players | "),
            Span::styled("Esc", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ]));

        let area = centered(frame.area(), 70, text.len() as u16 + 2);
        let login = Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" Login "),
        );
        frame.render_widget(login, area);
    }

    pub fn render_game_over(
        &self,
        frame: &mut Frame,
        screen: &GameOverScreen,
        username: Option<&str>,
    ) {
        let summary = &screen.summary;
        let mut text = vec![
            Line::from(Span::styled(
                "GAME OVER!",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
        ];
        if let Some(reason) = summary.end_reason {
            text.push(Line::from(Span::styled(
                reason.describe(),
                Style::default().fg(Color::Gray),
            )));
        }
        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                summary.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        text.push(Line::from(Span::styled(
            format!(
                "Food eaten: {} | Length: {} | Moves: {} | Time: {}",
                summary.food_eaten, summary.longest_snake, summary.moves, summary.elapsed
            ),
            Style::default().fg(Color::Gray),
        )));

        if let Some(message) = &screen.message {
            text.push(Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red),
            )));
        } else if let Some(best) = screen.highscore {
            let label = match username {
                Some(name) => format!("{name}'s Highscore: {best}"),
                None => format!("Your Highscore: {best}"),
            };
            text.push(Line::from(Span::styled(
                label,
                Style::default().fg(Color::Green),
            )));
        }
        if screen.new_best {
            text.push(Line::from(Span::styled(
                "New personal best!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
        }

        text.push(Line::from(""));
        for (index, item) in MenuItem::ALL.iter().enumerate() {
            let line = if index == screen.selected {
                Line::from(Span::styled(
                    format!("> {} <", item.label()),
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(item.label())
            };
            text.push(line);
        }

        let area = centered(frame.area(), 60, text.len() as u16 + 2);
        let game_over = Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
        frame.render_widget(game_over, area);
    }

    pub fn render_highscores(
        &self,
        frame: &mut Frame,
        entries: &[HighscoreEntry],
        current_player: Option<i64>,
    ) {
        let header = Row::new(vec!["#", "Player", "Score", "Date"])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

        let rows = entries.iter().enumerate().map(|(index, entry)| {
            let style = if Some(entry.player_id) == current_player {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from((index + 1).to_string()),
                Cell::from(entry.username.clone()),
                Cell::from(entry.score.to_string()),
                Cell::from(entry.date_achieved.format("%Y-%m-%d %H:%M").to_string()),
            ])
            .style(style)
        });

        let widths = [
            Constraint::Length(4),
            Constraint::Min(12),
            Constraint::Length(8),
            Constraint::Length(17),
        ];

        let height = entries.len().max(1) as u16 + 3;
        let area = centered(frame.area(), 56, height);
        let table = Table::new(rows, widths).header(header).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .title(" Highscores ")
                .title_bottom(Line::from(" any key to go back ").right_aligned()),
        );

        frame.render_widget(table, area);
        if entries.is_empty() {
            let inner = Rect::new(area.x + 1, area.y + 2, area.width.saturating_sub(2), 1);
            frame.render_widget(
                Paragraph::new("No highscores yet").alignment(Alignment::Center),
                inner.intersection(frame.area()),
            );
        }
    }

    pub fn render_too_small(&self, frame: &mut Frame, min_width: u16, min_height: u16) {
        let area = frame.area();
        let text = vec![
            Line::from(format!(
                "Terminal too small: {}x{}. Minimum required: {}x{}",
                area.width, area.height, min_width, min_height
            )),
            Line::from("Press any key to exit."),
        ];

        let notice_area = centered(area, area.width, 2);
        frame.render_widget(
            Paragraph::new(text).alignment(Alignment::Center),
            notice_area,
        );
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Rect of at most `width` x `height` centred in `area`
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

/// Snake and food drawn cell by cell onto the playable area
struct Board<'a> {
    state: &'a GameState,
}

impl Widget for Board<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        put_glyph(
            buf,
            area,
            self.state.food,
            FOOD_GLYPH,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        );

        // Tail first so the head wins if cells overlap after a collision
        for (index, segment) in self.state.snake.body.iter().enumerate().rev() {
            let (glyph, style) = if index == 0 {
                (
                    HEAD_GLYPH,
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                (BODY_GLYPH, Style::default().fg(Color::Green))
            };
            put_glyph(buf, area, *segment, glyph, style);
        }
    }
}

/// Write a glyph at a grid position; positions outside `area` or the buffer
/// are skipped.
fn put_glyph(buf: &mut Buffer, area: Rect, pos: Position, glyph: &str, style: Style) {
    let (Ok(x), Ok(y)) = (u16::try_from(pos.x), u16::try_from(pos.y)) else {
        return;
    };
    if x >= area.width || y >= area.height {
        return;
    }
    if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
        cell.set_symbol(glyph).set_style(style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Snake};
    use crate::modes::playing::GameSummary;
    use ratatui::{Terminal, backend::TestBackend};
    use std::time::Duration;

    fn row_text(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol().to_string())
            .collect()
    }

    fn screen_text(buffer: &Buffer) -> String {
        (0..buffer.area.height)
            .map(|y| row_text(buffer, y))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn sample_state() -> GameState {
        GameState::new(
            Snake::new(Position::new(5, 3), Direction::Right, 3),
            Position::new(10, 2),
            28,
            8,
            Duration::from_millis(100),
        )
    }

    #[test]
    fn test_playable_size_excludes_border() {
        assert_eq!(Renderer::playable_size(60, 20), (58, 18));
        assert_eq!(Renderer::playable_size(1, 1), (0, 0));
    }

    #[test]
    fn test_board_glyphs_and_header() {
        let renderer = Renderer::new();
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        let mut state = sample_state();
        state.score = 40;

        terminal
            .draw(|frame| renderer.render_playing(frame, &state, Some("alice"), &GameMetrics::new()))
            .unwrap();
        let buffer = terminal.backend().buffer();

        // Grid (x, y) sits at screen (x + 1, y + 1)
        assert_eq!(buffer[(6, 4)].symbol(), HEAD_GLYPH);
        assert_eq!(buffer[(5, 4)].symbol(), BODY_GLYPH);
        assert_eq!(buffer[(4, 4)].symbol(), BODY_GLYPH);
        assert_eq!(buffer[(11, 3)].symbol(), FOOD_GLYPH);

        let header = row_text(buffer, 0);
        assert!(header.contains("alice"), "{header}");
        assert!(header.contains("40"), "{header}");
    }

    #[test]
    fn test_out_of_bounds_cells_are_skipped() {
        let renderer = Renderer::new();
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        let mut state = sample_state();
        state.food = Position::new(500, 500);
        state.snake.body.insert(0, Position::new(-1, 3));

        terminal
            .draw(|frame| renderer.render_playing(frame, &state, None, &GameMetrics::new()))
            .unwrap();

        let text = screen_text(terminal.backend().buffer());
        assert!(!text.contains(FOOD_GLYPH));
        assert!(!text.contains(HEAD_GLYPH));
    }

    #[test]
    fn test_game_over_shows_menu_and_highscore() {
        let renderer = Renderer::new();
        let mut terminal = Terminal::new(TestBackend::new(70, 24)).unwrap();
        let screen = GameOverScreen {
            summary: GameSummary {
                score: 120,
                duration_seconds: 61,
                end_reason: None,
                food_eaten: 12,
                longest_snake: 15,
                moves: 230,
                elapsed: "01:01".to_string(),
            },
            highscore: Some(150),
            new_best: false,
            message: None,
            selected: 1,
        };

        terminal
            .draw(|frame| renderer.render_game_over(frame, &screen, Some("bob")))
            .unwrap();
        let text = screen_text(terminal.backend().buffer());

        assert!(text.contains("GAME OVER!"));
        assert!(text.contains("Final Score: 120"));
        assert!(text.contains("Moves: 230"));
        assert!(text.contains("bob's Highscore: 150"));
        assert!(text.contains("> View Highscores <"));
        assert!(text.contains("Play Again"));
    }

    #[test]
    fn test_highscore_table_lists_entries() {
        let renderer = Renderer::new();
        let mut terminal = Terminal::new(TestBackend::new(70, 20)).unwrap();
        let date = chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        let entries = vec![
            HighscoreEntry {
                id: 1,
                player_id: 1,
                score: 300,
                username: "SnakeMaster".to_string(),
                date_achieved: date,
            },
            HighscoreEntry {
                id: 2,
                player_id: 2,
                score: 220,
                username: "GameWizard".to_string(),
                date_achieved: date,
            },
        ];

        terminal
            .draw(|frame| renderer.render_highscores(frame, &entries, Some(2)))
            .unwrap();
        let text = screen_text(terminal.backend().buffer());

        assert!(text.contains("SnakeMaster"));
        assert!(text.contains("300"));
        assert!(text.contains("2024-05-01 10:30"));
    }

    #[test]
    fn test_login_shows_input_and_message() {
        let renderer = Renderer::new();
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        let mut screen = LoginScreen::new(Some("carol"), vec!["dave".to_string()]);
        screen.show_error("Username cannot be empty");

        terminal
            .draw(|frame| renderer.render_login(frame, &screen))
            .unwrap();
        let text = screen_text(terminal.backend().buffer());

        assert!(text.contains("carol"));
        assert!(text.contains("Username cannot be empty"));
        assert!(text.contains("Known players: dave"));
    }
}
