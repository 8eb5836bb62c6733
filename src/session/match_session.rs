use crate::game::{MatchState, ScoreState, Side};

pub const OPPONENT_DISCONNECTED_MESSAGE: &str = "Opponent disconnected";

/// Who runs ball physics for this client in the current match.
///
/// The coordinator only tells us a side; the role is fixed from it once, at
/// match start, so nothing downstream compares side strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authority {
    /// Steps the ball, detects goals, publishes ball and score
    Authoritative,
    /// Applies relayed ball state verbatim, never steps physics
    Mirror,
}

impl Authority {
    pub fn for_side(side: Side) -> Self {
        match side {
            Side::Left => Authority::Authoritative,
            Side::Right => Authority::Mirror,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchSession {
    pub side: Side,
    pub authority: Authority,
    pub opponent: String,
    /// Our rating when the match started, if registration reported one
    pub rating: Option<i32>,
}

impl MatchSession {
    pub fn new(side: Side, opponent: String, rating: Option<i32>) -> Self {
        Self {
            side,
            authority: Authority::for_side(side),
            opponent,
            rating,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameOutcome {
    Finished { won: bool, rating_change: i32 },
    OpponentDisconnected,
}

impl GameOutcome {
    pub fn headline(&self) -> String {
        match self {
            GameOutcome::Finished { won: true, .. } => "YOU WIN".to_string(),
            GameOutcome::Finished { won: false, .. } => "YOU LOSE".to_string(),
            GameOutcome::OpponentDisconnected => OPPONENT_DISCONNECTED_MESSAGE.to_string(),
        }
    }

    pub fn rating_change(&self) -> Option<i32> {
        match self {
            GameOutcome::Finished { rating_change, .. } => Some(*rating_change),
            GameOutcome::OpponentDisconnected => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActiveMatch {
    pub session: MatchSession,
    pub state: MatchState,
}

/// Client lifecycle: Idle → Registering → Waiting → InMatch → GameOver → Idle
#[derive(Debug, Clone)]
pub enum Phase {
    Idle,
    Registering { name: String },
    Waiting { name: String },
    InMatch(ActiveMatch),
    GameOver {
        session: MatchSession,
        final_score: ScoreState,
        outcome: GameOutcome,
    },
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Registering { .. } => "Registering",
            Phase::Waiting { .. } => "Waiting",
            Phase::InMatch(_) => "InMatch",
            Phase::GameOver { .. } => "GameOver",
        }
    }

    pub fn accepts_text(&self) -> bool {
        matches!(self, Phase::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authority_follows_side() {
        assert_eq!(Authority::for_side(Side::Left), Authority::Authoritative);
        assert_eq!(Authority::for_side(Side::Right), Authority::Mirror);

        let session = MatchSession::new(Side::Right, "bob".into(), Some(1000));
        assert_eq!(session.authority, Authority::Mirror);
    }

    #[test]
    fn test_outcome_headlines() {
        let lost = GameOutcome::Finished { won: false, rating_change: -8 };
        assert_eq!(lost.headline(), "YOU LOSE");
        assert_eq!(lost.rating_change(), Some(-8));

        let dropped = GameOutcome::OpponentDisconnected;
        assert_eq!(dropped.headline(), "Opponent disconnected");
        assert_eq!(dropped.rating_change(), None);
    }
}
