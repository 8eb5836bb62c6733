use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::game::{MatchState, Playfield, Side};
use crate::network::ConnectionStatus;
use crate::session::ActiveMatch;

use super::braille::BrailleCanvas;
use super::{rgb, View};

// Row 0: names and score
// Row 1: top border (bottom pixel row of the cell)
// Rows 2..N-2: playfield
// Row N-1: controls hint
const UI_HEADER_ROWS: u16 = 2;
const UI_FOOTER_ROWS: u16 = 1;

/// Draw a match in progress: scoreboard, playfield, controls.
pub fn render_match(frame: &mut Frame, view: &View, active: &ActiveMatch) {
    let area = frame.area();
    let field = view.client.field();

    let bg = Block::default().style(Style::default().bg(Color::Rgb(0, 0, 0)));
    frame.render_widget(bg, area);

    draw_scoreboard(frame, view, active, area);

    if area.height > UI_HEADER_ROWS + UI_FOOTER_ROWS {
        let field_area = Rect {
            x: area.x,
            y: area.y + UI_HEADER_ROWS,
            width: area.width,
            height: area.height - UI_HEADER_ROWS - UI_FOOTER_ROWS,
        };
        let canvas = draw_playfield(&active.state, field, field_area);
        render_braille_canvas(frame, &canvas, field_area, rgb(view.display.field_color));
    }

    draw_footer(frame, view, area);
}

/// Project the virtual playfield onto a Braille canvas covering `area`.
/// The top and bottom pixel rows are the walls.
pub fn draw_playfield(state: &MatchState, field: &Playfield, area: Rect) -> BrailleCanvas {
    let mut canvas = BrailleCanvas::new(area.width as usize, area.height as usize);
    let pixel_height = canvas.pixel_height();
    if pixel_height < 3 {
        return canvas;
    }

    canvas.draw_horizontal_line(0);
    canvas.draw_horizontal_line(pixel_height - 1);

    // Playable band sits between the two wall rows
    let offset_y = 1;
    let scale_x = canvas.pixel_width() as f32 / field.width;
    let scale_y = (pixel_height - 2) as f32 / field.height;
    // Relayed positions are drawn as received, so anything off the field
    // (or non-finite) is pinned to the canvas edge here
    let to_px = |v: f32, scale: f32| (v.max(0.0) * scale) as usize;
    let max_x = canvas.pixel_width().saturating_sub(1);
    let max_y = pixel_height - 1;

    let center_x = to_px(field.width / 2.0, scale_x);
    canvas.draw_dashed_vertical_line(center_x, offset_y, pixel_height - 1);

    let paddle_w = to_px(field.paddle_width, scale_x).max(1);
    let paddle_h = to_px(field.paddle_height, scale_y).max(1);
    for side in [Side::Left, Side::Right] {
        let x = to_px(field.paddle_x(side), scale_x).min(canvas.pixel_width().saturating_sub(paddle_w));
        let y = to_px(state.paddle(side).y, scale_y).saturating_add(offset_y).min(max_y);
        canvas.fill_rect(x, y, paddle_w, paddle_h);
    }

    let ball_w = to_px(field.ball_radius * 2.0, scale_x).max(1);
    let ball_h = to_px(field.ball_radius * 2.0, scale_y).max(1);
    let ball_x = to_px(state.ball.x, scale_x).saturating_sub(ball_w / 2).min(max_x);
    let ball_y = to_px(state.ball.y, scale_y)
        .saturating_sub(ball_h / 2)
        .saturating_add(offset_y)
        .min(max_y);
    canvas.fill_rect(ball_x, ball_y, ball_w, ball_h);

    canvas
}

fn render_braille_canvas(frame: &mut Frame, canvas: &BrailleCanvas, area: Rect, color: Color) {
    for row in 0..canvas.rows() {
        let row_area = Rect {
            x: area.x,
            y: area.y + row as u16,
            width: area.width,
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(canvas.row_string(row)).style(Style::default().fg(color)),
            row_area,
        );
    }
}

fn draw_scoreboard(frame: &mut Frame, view: &View, active: &ActiveMatch, area: Rect) {
    let name = view.client.profile().name.as_deref().unwrap_or("you");
    let me = match active.session.rating {
        Some(rating) => format!("{} ({})", name, rating),
        None => name.to_string(),
    };
    let (left_name, right_name) = match active.session.side {
        Side::Left => (me, active.session.opponent.clone()),
        Side::Right => (active.session.opponent.clone(), me),
    };
    let score = active.state.score;
    let accent = rgb(view.display.accent_color);

    let line = Line::from(vec![
        Span::styled(left_name, Style::default().fg(Color::White)),
        Span::styled(
            format!("   {}  :  {}   ", score.player1, score.player2),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(right_name, Style::default().fg(Color::White)),
    ]);

    frame.render_widget(
        Paragraph::new(line).alignment(Alignment::Center),
        Rect { height: 1.min(area.height), ..area },
    );
}

fn draw_footer(frame: &mut Frame, view: &View, area: Rect) {
    if area.height == 0 {
        return;
    }

    let (text, color) = match view.connection {
        ConnectionStatus::Connected => ("↑/↓ or W/S: Move  X: Surrender  Q: Quit".to_string(), Color::DarkGray),
        other => (other.describe(), Color::LightRed),
    };

    let footer_area = Rect {
        y: area.y + area.height - 1,
        height: 1,
        ..area
    };
    frame.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(color))
            .alignment(Alignment::Center),
        footer_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::BallState;

    fn lit(canvas: &BrailleCanvas, row: usize) -> usize {
        canvas.row_string(row).chars().filter(|c| *c != '\u{2800}').count()
    }

    #[test]
    fn test_playfield_projection_places_walls_paddles_and_ball() {
        let field = Playfield::default();
        let mut state = MatchState::new(Side::Left, &field);
        state.ball = BallState { x: 400.0, y: 300.0, dx: 0.0, dy: 0.0 };

        // 80x25 cells -> 160x100 pixels
        let canvas = draw_playfield(&state, &field, Rect::new(0, 0, 80, 25));

        // Walls span the full width
        assert_eq!(lit(&canvas, 0), 80);
        assert_eq!(lit(&canvas, 24), 80);

        // Middle row: both paddles, the ball and the center line
        let middle = canvas.row_string(12);
        let chars: Vec<char> = middle.chars().collect();
        assert_ne!(chars[0], '\u{2800}');
        assert_ne!(chars[79], '\u{2800}');
        assert_ne!(chars[40], '\u{2800}');
        assert_eq!(chars[20], '\u{2800}');
    }

    #[test]
    fn test_out_of_range_positions_are_pinned_to_edges() {
        let field = Playfield::default();
        let mut state = MatchState::new(Side::Right, &field);
        state.apply_opponent_paddle(f32::MAX);

        let ball: BallState =
            serde_json::from_str(r#"{"x":400,"y":1e300,"dx":5,"dy":5}"#).unwrap();
        assert!(ball.y.is_infinite());
        state.ball = ball;

        let canvas = draw_playfield(&state, &field, Rect::new(0, 0, 80, 25));
        assert_eq!(canvas.rows(), 25);
        // Wire values are kept as received
        assert_eq!(state.opponent_paddle().y, f32::MAX);

        for y in [f32::NAN, f32::NEG_INFINITY, -1e30] {
            state.ball = BallState { x: y, y, dx: 0.0, dy: 0.0 };
            state.apply_opponent_paddle(y);
            draw_playfield(&state, &field, Rect::new(0, 0, 80, 25));
        }
    }

    #[test]
    fn test_tiny_area_does_not_panic() {
        let field = Playfield::default();
        let state = MatchState::new(Side::Right, &field);

        let canvas = draw_playfield(&state, &field, Rect::new(0, 0, 1, 0));
        assert_eq!(canvas.rows(), 0);

        let canvas = draw_playfield(&state, &field, Rect::new(0, 0, 3, 1));
        assert_eq!(canvas.rows(), 1);
    }
}
