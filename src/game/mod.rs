pub mod input;
pub mod physics;
pub mod state;

pub use input::{poll_input, Bindings, InputAction, KeyState, PaddleDirection};
pub use state::{BallState, MatchState, Playfield, ScoreState, Side};
