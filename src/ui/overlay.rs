// Centered message boxes drawn over the current screen

use ratatui::{
    layout::{Alignment, Margin, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayStyle {
    Warning,
    Error,
    Success,
}

impl OverlayStyle {
    fn border_color(self) -> Color {
        match self {
            OverlayStyle::Warning => Color::Yellow,
            OverlayStyle::Error => Color::Red,
            OverlayStyle::Success => Color::Green,
        }
    }

    fn text_color(self) -> Color {
        match self {
            OverlayStyle::Warning => Color::Yellow,
            OverlayStyle::Error => Color::LightRed,
            OverlayStyle::Success => Color::LightGreen,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OverlayMessage {
    pub lines: Vec<String>,
    pub title: Option<String>,
    pub style: OverlayStyle,
}

impl OverlayMessage {
    pub fn new(style: OverlayStyle, lines: Vec<String>) -> Self {
        Self {
            lines,
            title: None,
            style,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Box size needed for the content, borders and padding included
    fn size(&self) -> (u16, u16) {
        let longest = self
            .lines
            .iter()
            .map(|line| line.chars().count())
            .chain(self.title.iter().map(|t| t.chars().count() + 2))
            .max()
            .unwrap_or(0);
        (longest as u16 + 6, self.lines.len() as u16 + 4)
    }
}

pub fn render_overlay(frame: &mut Frame, message: &OverlayMessage, area: Rect) {
    let (wanted_width, wanted_height) = message.size();
    let width = wanted_width.min(area.width.saturating_sub(4));
    let height = wanted_height.min(area.height.saturating_sub(2));

    let overlay_area = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    };

    frame.render_widget(Clear, overlay_area);

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(message.style.border_color()))
        .style(Style::default().bg(Color::Rgb(20, 20, 20)));
    if let Some(ref title) = message.title {
        block = block.title(format!(" {} ", title));
    }
    frame.render_widget(block, overlay_area);

    let text: Vec<Line> = message
        .lines
        .iter()
        .map(|line| {
            Line::from(Span::styled(
                line.clone(),
                Style::default().fg(message.style.text_color()),
            ))
        })
        .collect();

    frame.render_widget(
        Paragraph::new(text).alignment(Alignment::Center),
        overlay_area.inner(Margin::new(2, 1)),
    );
}
