pub mod braille;
pub mod overlay;
pub mod render;

use ratatui::{style::Color, Frame};

use crate::config::DisplayConfig;
use crate::game::ScoreState;
use crate::lobby::{render_lobby, LobbyState};
use crate::network::ConnectionStatus;
use crate::session::{GameOutcome, MatchClient, MatchSession, Phase, Profile};

pub use overlay::{OverlayMessage, OverlayStyle};

/// Everything a frame is drawn from. Rendering never mutates state.
pub struct View<'a> {
    pub client: &'a MatchClient,
    pub lobby: &'a LobbyState,
    pub connection: &'a ConnectionStatus,
    pub display: &'a DisplayConfig,
}

pub fn render(frame: &mut Frame, view: &View) {
    match view.client.phase() {
        Phase::InMatch(active) => render::render_match(frame, view, active),
        Phase::GameOver {
            session,
            final_score,
            outcome,
        } => {
            render_lobby(frame, view);
            let area = frame.area();
            let message = game_over_message(session, final_score, outcome, view.client.profile());
            overlay::render_overlay(frame, &message, area);
        }
        _ => render_lobby(frame, view),
    }
}

pub fn game_over_message(
    session: &MatchSession,
    final_score: &ScoreState,
    outcome: &GameOutcome,
    profile: &Profile,
) -> OverlayMessage {
    let style = match outcome {
        GameOutcome::Finished { won: true, .. } => OverlayStyle::Success,
        GameOutcome::Finished { won: false, .. } => OverlayStyle::Warning,
        GameOutcome::OpponentDisconnected => OverlayStyle::Error,
    };

    let mut lines = vec![
        outcome.headline(),
        String::new(),
        format!(
            "You {} - {} {}",
            final_score.for_side(session.side),
            final_score.for_side(session.side.opposite()),
            session.opponent
        ),
    ];
    if let Some(change) = outcome.rating_change() {
        let now = profile
            .rating
            .map(|r| format!(" (now {})", r))
            .unwrap_or_default();
        lines.push(format!("Rating {:+}{}", change, now));
    }
    lines.push(String::new());
    lines.push("Enter: Play again  |  Q: Quit".to_string());

    OverlayMessage::new(style, lines).with_title("Game over")
}

pub fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb(r, g, b)
}
