// Lobby rendering with Ratatui

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use serde_json::Value;

use crate::network::ConnectionStatus;
use crate::session::Phase;
use crate::ui::{rgb, View};

const LEADERBOARD_ROWS: usize = 10;

const TITLE: [&str; 5] = [
    r" _   _ _____ _____ ____   ___  _   _  ____ ",
    r"| \ | | ____|_   _|  _ \ / _ \| \ | |/ ___|",
    r"|  \| |  _|   | | | |_) | | | |  \| | |  _ ",
    r"| |\  | |___  | | |  __/| |_| | |\  | |_| |",
    r"|_| \_|_____| |_| |_|    \___/|_| \_|\____|",
];

/// Render everything outside a match: name entry, registration,
/// matchmaking, and the leaderboard if one has been fetched.
pub fn render_lobby(frame: &mut Frame, view: &View) {
    let area = frame.area();
    let accent = rgb(view.display.accent_color);

    let bg = Block::default().style(Style::default().bg(Color::Rgb(0, 0, 0)));
    frame.render_widget(bg, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Title
            Constraint::Length(4), // Phase status
            Constraint::Min(3),    // Leaderboard
            Constraint::Length(1), // Connection status
            Constraint::Length(1), // Controls hint
        ])
        .split(area);

    let title: Vec<Line> = std::iter::once(Line::from(""))
        .chain(TITLE.iter().map(|row| {
            Line::from(Span::styled(
                *row,
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ))
        }))
        .collect();
    frame.render_widget(Paragraph::new(title).alignment(Alignment::Center), chunks[0]);

    frame.render_widget(
        Paragraph::new(phase_lines(view)).alignment(Alignment::Center),
        chunks[1],
    );

    if let Some(board) = view.client.leaderboard() {
        let mut lines = vec![Line::from(Span::styled(
            "LEADERBOARD",
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ))];
        lines.extend(
            leaderboard_lines(board, LEADERBOARD_ROWS)
                .into_iter()
                .map(|row| Line::from(Span::styled(row, Style::default().fg(Color::White)))),
        );
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), chunks[2]);
    }

    let status_color = match view.connection {
        ConnectionStatus::Connected => Color::DarkGray,
        ConnectionStatus::Connecting => Color::Yellow,
        ConnectionStatus::Closed | ConnectionStatus::Failed(_) => Color::LightRed,
    };
    frame.render_widget(
        Paragraph::new(view.connection.describe())
            .style(Style::default().fg(status_color))
            .alignment(Alignment::Center),
        chunks[3],
    );

    frame.render_widget(
        Paragraph::new(controls_hint(view.client.phase()))
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        chunks[4],
    );

    if matches!(view.client.phase(), Phase::Idle) {
        render_name_dialog(frame, &view.lobby.name_input, accent);
    }
}

fn phase_lines(view: &View) -> Vec<Line<'static>> {
    let rating = view
        .client
        .profile()
        .rating
        .map(|r| format!("Rating: {}", r))
        .unwrap_or_default();

    let headline = match view.client.phase() {
        Phase::Registering { name } => format!("Registering as {}...", name),
        Phase::Waiting { name } => format!("{}, waiting for an opponent...", name),
        _ => String::new(),
    };

    vec![
        Line::from(""),
        Line::from(Span::styled(headline, Style::default().fg(Color::White))),
        Line::from(Span::styled(rating, Style::default().fg(Color::Gray))),
    ]
}

fn controls_hint(phase: &Phase) -> &'static str {
    match phase {
        Phase::Idle => "Enter: Join  Tab: Leaderboard  Esc: Quit",
        Phase::GameOver { .. } => "Enter: Play again  Tab: Leaderboard  Q: Quit",
        _ => "Q/Esc: Quit",
    }
}

/// Name input dialog overlay
fn render_name_dialog(frame: &mut Frame, name: &str, accent: Color) {
    let area = frame.area();

    let dialog_width = 40.min(area.width.saturating_sub(4));
    let dialog_height = 5.min(area.height);
    let dialog_area = Rect {
        x: area.x + area.width.saturating_sub(dialog_width) / 2,
        y: area.y + area.height.saturating_sub(dialog_height) / 2 + 3,
        width: dialog_width,
        height: dialog_height,
    }
    .intersection(area);

    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(" Display name ")
        .style(Style::default().bg(Color::Rgb(20, 20, 20)));

    let text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(name.to_string(), Style::default().fg(Color::Yellow)),
            Span::styled("_", Style::default().fg(Color::Yellow).add_modifier(Modifier::SLOW_BLINK)),
        ]),
    ];

    frame.render_widget(
        Paragraph::new(text).block(block).alignment(Alignment::Center),
        dialog_area,
    );
}

/// Format a leaderboard payload. Entries shaped `{name, rating}` get a
/// column layout; anything else is shown as compact JSON.
pub fn leaderboard_lines(board: &Value, limit: usize) -> Vec<String> {
    match board {
        Value::Array(entries) if entries.is_empty() => vec!["(no players yet)".to_string()],
        Value::Array(entries) => entries
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, entry)| format!("{:>2}. {}", i + 1, describe_entry(entry)))
            .collect(),
        other => vec![other.to_string()],
    }
}

fn describe_entry(entry: &Value) -> String {
    let name = entry.get("name").and_then(Value::as_str);
    let rating = entry.get("rating").and_then(Value::as_f64);

    match (name, rating) {
        (Some(name), Some(rating)) => format!("{:<16} {:>6.0}", name, rating),
        (Some(name), None) => name.to_string(),
        _ => entry.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_leaderboard_rows() {
        let board = json!([
            {"name": "ada", "rating": 1310},
            {"name": "bob"},
            {"id": 7},
        ]);

        let lines = leaderboard_lines(&board, 10);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], format!(" 1. {:<16} {:>6}", "ada", 1310));
        assert_eq!(lines[1], " 2. bob");
        assert_eq!(lines[2], r#" 3. {"id":7}"#);
    }

    #[test]
    fn test_leaderboard_limit_and_odd_payloads() {
        let board = Value::Array((0..20).map(|i| json!({"name": format!("p{}", i)})).collect());
        assert_eq!(leaderboard_lines(&board, 10).len(), 10);

        assert_eq!(leaderboard_lines(&json!([]), 10), vec!["(no players yet)"]);
        assert_eq!(leaderboard_lines(&json!({"top": 1}), 10), vec![r#"{"top":1}"#]);
    }
}
