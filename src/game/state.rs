use serde::{Deserialize, Serialize};

use crate::config::PhysicsConfig;

/// Which end of the table a player defends. Assigned by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Fixed playfield geometry, in virtual units. Speeds are per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub ball_radius: f32,
    pub ball_speed: f32,
    pub paddle_speed: f32,
}

impl Playfield {
    pub fn from_config(physics: &PhysicsConfig) -> Self {
        Self {
            width: physics.field_width,
            height: physics.field_height,
            paddle_width: physics.paddle_width,
            paddle_height: physics.paddle_height,
            ball_radius: physics.ball_radius,
            ball_speed: physics.ball_speed,
            paddle_speed: physics.paddle_speed,
        }
    }

    /// Highest y a paddle's top edge may take.
    pub fn paddle_max_y(&self) -> f32 {
        (self.height - self.paddle_height).max(0.0)
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Left edge of the paddle defending `side`.
    pub fn paddle_x(&self, side: Side) -> f32 {
        match side {
            Side::Left => 0.0,
            Side::Right => self.width - self.paddle_width,
        }
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self::from_config(&PhysicsConfig::default())
    }
}

/// Ball position and per-frame velocity. Also the `ballUpdate` payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
}

impl BallState {
    /// Ball at the center of the field, served toward the right.
    pub fn serve(field: &Playfield) -> Self {
        let (x, y) = field.center();
        Self {
            x,
            y,
            dx: field.ball_speed,
            dy: field.ball_speed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddleState {
    pub y: f32,
}

impl PaddleState {
    pub fn centered(field: &Playfield) -> Self {
        Self {
            y: field.height / 2.0 - field.paddle_height / 2.0,
        }
    }
}

/// `player1` is the left side, `player2` the right side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    pub player1: u32,
    pub player2: u32,
}

impl ScoreState {
    pub fn award(&mut self, scorer: Side) {
        match scorer {
            Side::Left => self.player1 += 1,
            Side::Right => self.player2 += 1,
        }
    }

    pub fn for_side(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.player1,
            Side::Right => self.player2,
        }
    }
}

/// Local copy of one match's playing state.
///
/// The local paddle is only written through [`MatchState::move_local_paddle`];
/// the opponent paddle only through [`MatchState::apply_opponent_paddle`],
/// which callers invoke for inbound messages.
#[derive(Debug, Clone)]
pub struct MatchState {
    side: Side,
    local_paddle: PaddleState,
    opponent_paddle: PaddleState,
    pub ball: BallState,
    pub score: ScoreState,
}

impl MatchState {
    pub fn new(side: Side, field: &Playfield) -> Self {
        Self {
            side,
            local_paddle: PaddleState::centered(field),
            opponent_paddle: PaddleState::centered(field),
            ball: BallState::serve(field),
            score: ScoreState::default(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn local_paddle(&self) -> PaddleState {
        self.local_paddle
    }

    pub fn opponent_paddle(&self) -> PaddleState {
        self.opponent_paddle
    }

    /// Paddle defending `side`, whoever owns it.
    pub fn paddle(&self, side: Side) -> PaddleState {
        if side == self.side {
            self.local_paddle
        } else {
            self.opponent_paddle
        }
    }

    /// Moves the local paddle by `delta`, clamped to the playfield.
    pub fn move_local_paddle(&mut self, delta: f32, field: &Playfield) {
        self.local_paddle.y = (self.local_paddle.y + delta).clamp(0.0, field.paddle_max_y());
    }

    pub fn apply_opponent_paddle(&mut self, y: f32) {
        self.opponent_paddle.y = y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_playfield_dimensions() {
        let field = Playfield::default();
        assert_eq!(field.width, 800.0);
        assert_eq!(field.height, 600.0);
        assert_eq!(field.paddle_width, 10.0);
        assert_eq!(field.paddle_height, 100.0);
        assert_eq!(field.ball_radius, 10.0);
        assert_eq!(field.ball_speed, 5.0);
        assert_eq!(field.paddle_x(Side::Right), 790.0);
    }

    #[test]
    fn test_new_match_is_centered() {
        let field = Playfield::default();
        let state = MatchState::new(Side::Right, &field);

        assert_eq!(state.local_paddle().y, 250.0);
        assert_eq!(state.opponent_paddle().y, 250.0);
        assert_eq!((state.ball.x, state.ball.y), (400.0, 300.0));
        assert_eq!(state.score, ScoreState::default());
    }

    #[test]
    fn test_local_paddle_is_clamped() {
        let field = Playfield::default();
        let mut state = MatchState::new(Side::Left, &field);

        state.move_local_paddle(-10_000.0, &field);
        assert_eq!(state.local_paddle().y, 0.0);

        state.move_local_paddle(10_000.0, &field);
        assert_eq!(state.local_paddle().y, 500.0);
    }

    #[test]
    fn test_paddle_lookup_by_side() {
        let field = Playfield::default();
        let mut state = MatchState::new(Side::Right, &field);
        state.apply_opponent_paddle(42.0);

        assert_eq!(state.paddle(Side::Left).y, 42.0);
        assert_eq!(state.paddle(Side::Right).y, 250.0);
    }

    #[test]
    fn test_score_award() {
        let mut score = ScoreState::default();
        score.award(Side::Right);
        score.award(Side::Right);
        score.award(Side::Left);

        assert_eq!(score.for_side(Side::Left), 1);
        assert_eq!(score.for_side(Side::Right), 2);
    }
}
