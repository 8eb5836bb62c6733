use rand::Rng;

use super::input::PaddleDirection;
use super::state::{BallState, MatchState, Playfield, Side};

/// What happened during one authoritative ball step.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PhysicsEvents {
    pub wall_collision: bool,
    pub paddle_collision: bool,
    /// Side that scored, if the ball crossed a goal line.
    pub goal: Option<Side>,
}

impl PhysicsEvents {
    pub fn any(&self) -> bool {
        self.wall_collision || self.paddle_collision || self.goal.is_some()
    }
}

/// Vertical distance the local paddle travels this frame.
pub fn paddle_delta(direction: PaddleDirection, field: &Playfield) -> f32 {
    match direction {
        PaddleDirection::Up => -field.paddle_speed,
        PaddleDirection::Down => field.paddle_speed,
        PaddleDirection::Still => 0.0,
    }
}

/// Advances the ball one frame. Only the authoritative side calls this.
///
/// A ball already on or past a goal line scores before it moves: the scorer
/// gets a point and the ball restarts from the center heading toward them.
pub fn update_with_events<R: Rng + ?Sized>(
    state: &mut MatchState,
    field: &Playfield,
    rng: &mut R,
) -> PhysicsEvents {
    let mut events = PhysicsEvents::default();

    if let Some(scorer) = goal_scorer(&state.ball, field) {
        state.score.award(scorer);
        reset_ball(&mut state.ball, scorer, field);
        events.goal = Some(scorer);
        return events;
    }

    state.ball.x += state.ball.dx;
    state.ball.y += state.ball.dy;

    let r = field.ball_radius;
    if state.ball.y - r <= 0.0 {
        state.ball.y = r;
        state.ball.dy = state.ball.dy.abs();
        events.wall_collision = true;
    } else if state.ball.y + r >= field.height {
        state.ball.y = field.height - r;
        state.ball.dy = -state.ball.dy.abs();
        events.wall_collision = true;
    }

    let left_y = state.paddle(Side::Left).y;
    let right_y = state.paddle(Side::Right).y;
    if bounce_off_paddle(&mut state.ball, Side::Left, left_y, field, rng)
        || bounce_off_paddle(&mut state.ball, Side::Right, right_y, field, rng)
    {
        events.paddle_collision = true;
    }

    events
}

fn goal_scorer(ball: &BallState, field: &Playfield) -> Option<Side> {
    if ball.x <= 0.0 {
        Some(Side::Right)
    } else if ball.x >= field.width {
        Some(Side::Left)
    } else {
        None
    }
}

/// Puts the ball back at the center, moving toward `toward` at base speed.
/// Vertical velocity is left as it was.
pub fn reset_ball(ball: &mut BallState, toward: Side, field: &Playfield) {
    let (x, y) = field.center();
    ball.x = x;
    ball.y = y;
    ball.dx = match toward {
        Side::Left => -field.ball_speed,
        Side::Right => field.ball_speed,
    };
}

fn bounce_off_paddle<R: Rng + ?Sized>(
    ball: &mut BallState,
    side: Side,
    paddle_y: f32,
    field: &Playfield,
    rng: &mut R,
) -> bool {
    let r = field.ball_radius;
    let paddle_left = field.paddle_x(side);
    let paddle_right = paddle_left + field.paddle_width;

    // Only a ball heading into the paddle's face, with its center still in
    // play, can bounce.
    let approaching = match side {
        Side::Left => ball.dx < 0.0 && ball.x > 0.0 && ball.x - r <= paddle_right,
        Side::Right => ball.dx > 0.0 && ball.x < field.width && ball.x + r >= paddle_left,
    };
    let overlaps_vertically =
        ball.y + r >= paddle_y && ball.y - r <= paddle_y + field.paddle_height;

    if !(approaching && overlaps_vertically) {
        return false;
    }

    ball.dx = -ball.dx;
    ball.dy = rng.gen_range(-field.ball_speed..=field.ball_speed);
    ball.x = match side {
        Side::Left => paddle_right + r,
        Side::Right => paddle_left - r,
    };
    true
}
