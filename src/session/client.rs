use rand::Rng;
use tracing::{debug, info, trace, warn};

use crate::game::physics::{paddle_delta, update_with_events};
use crate::game::{MatchState, PaddleDirection, Playfield};
use crate::network::{ClientMessage, ServerMessage};

use super::match_session::{ActiveMatch, Authority, GameOutcome, MatchSession, Phase};

/// Who we are to the coordinator. Survives across matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub name: Option<String>,
    pub rating: Option<i32>,
}

/// The match client state machine.
///
/// Every operation returns the messages it wants sent; delivery is the
/// caller's job and is fire-and-forget. Inputs that do not fit the current
/// phase are ignored.
#[derive(Debug)]
pub struct MatchClient {
    field: Playfield,
    phase: Phase,
    profile: Profile,
    leaderboard: Option<serde_json::Value>,
}

impl MatchClient {
    pub fn new(field: Playfield) -> Self {
        Self {
            field,
            phase: Phase::Idle,
            profile: Profile::default(),
            leaderboard: None,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn field(&self) -> &Playfield {
        &self.field
    }

    pub fn leaderboard(&self) -> Option<&serde_json::Value> {
        self.leaderboard.as_ref()
    }

    /// Idle → Registering
    pub fn submit_name(&mut self, name: &str) -> Vec<ClientMessage> {
        if !matches!(self.phase, Phase::Idle) {
            debug!("Ignoring name submission while {}", self.phase.name());
            return Vec::new();
        }

        let name = name.trim();
        if name.is_empty() {
            return Vec::new();
        }

        info!("Registering as {:?}", name);
        self.profile.name = Some(name.to_string());
        self.phase = Phase::Registering {
            name: name.to_string(),
        };
        vec![ClientMessage::Register {
            name: name.to_string(),
        }]
    }

    /// Apply one coordinator event.
    pub fn handle(&mut self, msg: ServerMessage) -> Vec<ClientMessage> {
        let event = msg.event_name();

        match msg {
            ServerMessage::Registered { rating } => {
                if let Phase::Registering { name } = &self.phase {
                    info!("Registered with rating {}, looking for a match", rating);
                    let name = name.clone();
                    self.profile.rating = Some(rating);
                    self.phase = Phase::Waiting { name };
                    return vec![ClientMessage::FindGame];
                }
            }
            ServerMessage::Waiting => {
                if matches!(self.phase, Phase::Waiting { .. }) {
                    debug!("Queued for a match");
                    return Vec::new();
                }
            }
            ServerMessage::GameStart { side, opponent } => {
                if matches!(self.phase, Phase::Waiting { .. }) {
                    let session = MatchSession::new(side, opponent, self.profile.rating);
                    info!(
                        "Match started against {:?} on the {:?} side ({:?})",
                        session.opponent, side, session.authority
                    );
                    self.phase = Phase::InMatch(ActiveMatch {
                        session,
                        state: MatchState::new(side, &self.field),
                    });
                    return Vec::new();
                }
            }
            ServerMessage::OpponentPaddleMove { y } => {
                if let Phase::InMatch(active) = &mut self.phase {
                    active.state.apply_opponent_paddle(y);
                    return Vec::new();
                }
            }
            ServerMessage::BallUpdate(ball) => {
                if let Phase::InMatch(active) = &mut self.phase {
                    match active.session.authority {
                        Authority::Mirror => active.state.ball = ball,
                        // Two clients both believe they own the ball. Not
                        // reconciled here; the coordinator assigned sides.
                        Authority::Authoritative => warn!(
                            "Received ballUpdate while authoritative for the {:?} side; ignoring",
                            active.session.side
                        ),
                    }
                    return Vec::new();
                }
            }
            ServerMessage::ScoreUpdate(score) => {
                if let Phase::InMatch(active) = &mut self.phase {
                    active.state.score = score;
                    return Vec::new();
                }
            }
            ServerMessage::GameOver { won, rating_change } => {
                if matches!(self.phase, Phase::InMatch(_)) {
                    self.finish(GameOutcome::Finished { won, rating_change });
                    return Vec::new();
                }
            }
            ServerMessage::OpponentDisconnected => {
                if matches!(self.phase, Phase::InMatch(_)) {
                    self.finish(GameOutcome::OpponentDisconnected);
                    return Vec::new();
                }
            }
            ServerMessage::Leaderboard(value) => {
                self.leaderboard = Some(value);
                return Vec::new();
            }
        }

        debug!("Ignoring {} while {}", event, self.phase.name());
        Vec::new()
    }

    /// One frame of play. Does nothing outside a match.
    ///
    /// The local paddle moves and is always published. Only the
    /// authoritative side steps the ball and publishes ball and score.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        direction: PaddleDirection,
        rng: &mut R,
    ) -> Vec<ClientMessage> {
        let field = self.field;
        let Phase::InMatch(active) = &mut self.phase else {
            return Vec::new();
        };

        active
            .state
            .move_local_paddle(paddle_delta(direction, &field), &field);
        let mut outbound = vec![ClientMessage::PaddleMove {
            y: active.state.local_paddle().y,
        }];

        if active.session.authority == Authority::Authoritative {
            let events = update_with_events(&mut active.state, &field, rng);
            outbound.push(ClientMessage::BallUpdate(active.state.ball));
            if events.any() {
                trace!("Ball step {:?} -> {:?}", events, active.state.ball);
            }
            if let Some(scorer) = events.goal {
                debug!("Goal for the {:?} side, score {:?}", scorer, active.state.score);
                outbound.push(ClientMessage::Score(active.state.score));
            }
        }

        outbound
    }

    /// Ask the coordinator to end the match; the phase changes only when it
    /// answers with `gameOver`.
    pub fn surrender(&mut self) -> Vec<ClientMessage> {
        if matches!(self.phase, Phase::InMatch(_)) {
            info!("Surrendering");
            vec![ClientMessage::Surrender]
        } else {
            Vec::new()
        }
    }

    pub fn request_leaderboard(&self) -> Vec<ClientMessage> {
        vec![ClientMessage::GetLeaderboard]
    }

    /// GameOver → Idle ("play again"). Returns whether the phase changed.
    pub fn acknowledge(&mut self) -> bool {
        if matches!(self.phase, Phase::GameOver { .. }) {
            self.phase = Phase::Idle;
            true
        } else {
            false
        }
    }

    fn finish(&mut self, outcome: GameOutcome) {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::InMatch(active) => {
                if let (Some(rating), Some(change)) = (self.profile.rating, outcome.rating_change()) {
                    self.profile.rating = Some(rating.saturating_add(change));
                }
                info!(
                    "Match against {:?} over: {} (score {:?})",
                    active.session.opponent,
                    outcome.headline(),
                    active.state.score
                );
                self.phase = Phase::GameOver {
                    session: active.session,
                    final_score: active.state.score,
                    outcome,
                };
            }
            other => self.phase = other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{BallState, ScoreState, Side};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn client_in_match(side: Side) -> MatchClient {
        let mut client = MatchClient::new(Playfield::default());
        client.submit_name("ada");
        client.handle(ServerMessage::Registered { rating: 1200 });
        client.handle(ServerMessage::GameStart {
            side,
            opponent: "bob".to_string(),
        });
        client
    }

    fn active(client: &MatchClient) -> &ActiveMatch {
        match client.phase() {
            Phase::InMatch(active) => active,
            other => panic!("expected InMatch, got {}", other.name()),
        }
    }

    fn place_ball(client: &mut MatchClient, ball: BallState) {
        match &mut client.phase {
            Phase::InMatch(active) => active.state.ball = ball,
            other => panic!("expected InMatch, got {}", other.name()),
        }
    }

    #[test]
    fn test_full_lifecycle() {
        let mut client = MatchClient::new(Playfield::default());
        assert!(matches!(client.phase(), Phase::Idle));

        let out = client.submit_name("  ada ");
        assert_eq!(out, vec![ClientMessage::Register { name: "ada".into() }]);
        assert!(matches!(client.phase(), Phase::Registering { name } if name == "ada"));

        let out = client.handle(ServerMessage::Registered { rating: 1200 });
        assert_eq!(out, vec![ClientMessage::FindGame]);
        assert!(matches!(client.phase(), Phase::Waiting { .. }));
        assert_eq!(client.profile().rating, Some(1200));

        assert!(client.handle(ServerMessage::Waiting).is_empty());
        assert!(matches!(client.phase(), Phase::Waiting { .. }));

        client.handle(ServerMessage::GameStart {
            side: Side::Right,
            opponent: "bob".into(),
        });
        let session = &active(&client).session;
        assert_eq!(session.opponent, "bob");
        assert_eq!(session.authority, Authority::Mirror);

        client.handle(ServerMessage::GameOver {
            won: true,
            rating_change: 15,
        });
        match client.phase() {
            Phase::GameOver { outcome, .. } => {
                assert_eq!(
                    *outcome,
                    GameOutcome::Finished {
                        won: true,
                        rating_change: 15
                    }
                )
            }
            other => panic!("expected GameOver, got {}", other.name()),
        }
        assert_eq!(client.profile().rating, Some(1215));

        assert!(client.acknowledge());
        assert!(matches!(client.phase(), Phase::Idle));
        assert_eq!(client.profile().name.as_deref(), Some("ada"));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let mut client = MatchClient::new(Playfield::default());
        assert!(client.submit_name("   ").is_empty());
        assert!(matches!(client.phase(), Phase::Idle));
    }

    #[test]
    fn test_out_of_phase_events_are_ignored() {
        let mut client = MatchClient::new(Playfield::default());

        assert!(client.handle(ServerMessage::Registered { rating: 1 }).is_empty());
        client.handle(ServerMessage::GameStart {
            side: Side::Left,
            opponent: "bob".into(),
        });
        client.handle(ServerMessage::OpponentDisconnected);
        assert!(matches!(client.phase(), Phase::Idle));

        client.submit_name("ada");
        client.handle(ServerMessage::GameStart {
            side: Side::Left,
            opponent: "bob".into(),
        });
        assert!(matches!(client.phase(), Phase::Registering { .. }));
        assert!(client.submit_name("again").is_empty());
        assert!(!client.acknowledge());
    }

    #[test]
    fn test_tick_outside_match_emits_nothing() {
        let mut client = MatchClient::new(Playfield::default());
        client.submit_name("ada");
        client.handle(ServerMessage::Registered { rating: 1200 });

        assert!(client.tick(PaddleDirection::Up, &mut rng()).is_empty());
        assert!(client.surrender().is_empty());
    }

    #[test]
    fn test_local_paddle_stays_in_bounds_every_frame() {
        let mut client = client_in_match(Side::Left);
        let mut rng = rng();
        let max_y = client.field().paddle_max_y();

        for direction in [PaddleDirection::Up, PaddleDirection::Down, PaddleDirection::Up] {
            for _ in 0..120 {
                let out = client.tick(direction, &mut rng);
                let y = active(&client).state.local_paddle().y;
                assert!((0.0..=max_y).contains(&y), "paddle y {} out of bounds", y);
                assert_eq!(out[0], ClientMessage::PaddleMove { y });
            }
        }
    }

    #[test]
    fn test_paddle_move_emitted_when_still() {
        let mut client = client_in_match(Side::Right);
        let out = client.tick(PaddleDirection::Still, &mut rng());
        assert_eq!(out, vec![ClientMessage::PaddleMove { y: 250.0 }]);
    }

    #[test]
    fn test_only_left_side_advances_ball() {
        let mut left = client_in_match(Side::Left);
        let mut right = client_in_match(Side::Right);
        let mut rng = rng();
        let start = active(&left).state.ball;
        assert_eq!(start, active(&right).state.ball);

        let left_out = left.tick(PaddleDirection::Still, &mut rng);
        let right_out = right.tick(PaddleDirection::Still, &mut rng);

        let moved = active(&left).state.ball;
        assert_eq!((moved.x, moved.y), (start.x + start.dx, start.y + start.dy));
        assert!(left_out.contains(&ClientMessage::BallUpdate(moved)));

        assert_eq!(active(&right).state.ball, start);
        assert!(right_out
            .iter()
            .all(|m| matches!(m, ClientMessage::PaddleMove { .. })));
    }

    #[test]
    fn test_goal_on_left_line_scores_for_opponent_and_resets() {
        let mut client = client_in_match(Side::Left);
        place_ball(&mut client, BallState { x: 0.0, y: 300.0, dx: -5.0, dy: 0.0 });

        let out = client.tick(PaddleDirection::Still, &mut rng());

        let state = &active(&client).state;
        assert_eq!(state.score, ScoreState { player1: 0, player2: 1 });
        assert_eq!(state.ball, BallState { x: 400.0, y: 300.0, dx: 5.0, dy: 0.0 });

        let scores: Vec<_> = out
            .iter()
            .filter(|m| matches!(m, ClientMessage::Score(_)))
            .collect();
        assert_eq!(scores, vec![&ClientMessage::Score(ScoreState { player1: 0, player2: 1 })]);
        assert!(out.contains(&ClientMessage::BallUpdate(state.ball)));
    }

    #[test]
    fn test_paddle_move_relays_exactly() {
        let mut sender = client_in_match(Side::Left);
        let mut receiver = client_in_match(Side::Right);
        let mut rng = rng();

        for _ in 0..7 {
            sender.tick(PaddleDirection::Down, &mut rng);
        }
        let out = sender.tick(PaddleDirection::Down, &mut rng);
        let ClientMessage::PaddleMove { y } = out[0] else {
            panic!("first message should be paddleMove");
        };

        receiver.handle(ServerMessage::OpponentPaddleMove { y });

        assert_eq!(active(&receiver).state.opponent_paddle().y, y);
        assert_eq!(active(&receiver).state.local_paddle().y, 250.0);
    }

    #[test]
    fn test_mirror_applies_ball_update_verbatim() {
        let mut client = client_in_match(Side::Right);
        let ball = BallState { x: 12.5, y: 99.0, dx: -3.0, dy: 4.25 };

        client.handle(ServerMessage::BallUpdate(ball));
        client.tick(PaddleDirection::Still, &mut rng());

        assert_eq!(active(&client).state.ball, ball);
    }

    #[test]
    fn test_authoritative_side_ignores_ball_update() {
        let mut client = client_in_match(Side::Left);
        let before = active(&client).state.ball;

        client.handle(ServerMessage::BallUpdate(BallState { x: 1.0, y: 1.0, dx: 0.0, dy: 0.0 }));

        assert_eq!(active(&client).state.ball, before);
    }

    #[test]
    fn test_score_update_overwrites_score() {
        let mut client = client_in_match(Side::Right);
        client.handle(ServerMessage::ScoreUpdate(ScoreState { player1: 4, player2: 2 }));
        assert_eq!(active(&client).state.score, ScoreState { player1: 4, player2: 2 });
    }

    #[test]
    fn test_opponent_disconnect_ends_match_regardless_of_score() {
        let mut client = client_in_match(Side::Right);
        client.handle(ServerMessage::ScoreUpdate(ScoreState { player1: 1, player2: 9 }));

        client.handle(ServerMessage::OpponentDisconnected);

        match client.phase() {
            Phase::GameOver { outcome, final_score, .. } => {
                assert_eq!(*outcome, GameOutcome::OpponentDisconnected);
                assert_eq!(outcome.headline(), "Opponent disconnected");
                assert_eq!(final_score.player2, 9);
            }
            other => panic!("expected GameOver, got {}", other.name()),
        }
        assert_eq!(client.profile().rating, Some(1200));
    }

    #[test]
    fn test_extreme_rating_change_saturates() {
        let mut client = MatchClient::new(Playfield::default());
        client.submit_name("ada");
        client.handle(ServerMessage::Registered { rating: i32::MAX - 1 });
        client.handle(ServerMessage::GameStart {
            side: Side::Left,
            opponent: "bob".into(),
        });

        client.handle(ServerMessage::GameOver {
            won: true,
            rating_change: i32::MAX,
        });

        assert_eq!(client.profile().rating, Some(i32::MAX));
    }

    #[test]
    fn test_surrender_waits_for_game_over() {
        let mut client = client_in_match(Side::Left);

        assert_eq!(client.surrender(), vec![ClientMessage::Surrender]);
        assert!(matches!(client.phase(), Phase::InMatch(_)));

        client.handle(ServerMessage::GameOver {
            won: false,
            rating_change: -12,
        });
        assert!(matches!(client.phase(), Phase::GameOver { .. }));
        assert_eq!(client.profile().rating, Some(1188));
    }

    #[test]
    fn test_second_match_starts_fresh() {
        let mut client = client_in_match(Side::Left);
        let mut rng = rng();
        for _ in 0..30 {
            client.tick(PaddleDirection::Up, &mut rng);
        }
        client.handle(ServerMessage::OpponentPaddleMove { y: 3.0 });
        client.handle(ServerMessage::OpponentDisconnected);
        client.acknowledge();

        client.submit_name("ada");
        client.handle(ServerMessage::Registered { rating: 1200 });
        client.handle(ServerMessage::GameStart {
            side: Side::Right,
            opponent: "cy".into(),
        });

        let active = active(&client);
        assert_eq!(active.session.authority, Authority::Mirror);
        assert_eq!(active.state.local_paddle().y, 250.0);
        assert_eq!(active.state.opponent_paddle().y, 250.0);
        assert_eq!(active.state.score, ScoreState::default());
        assert_eq!((active.state.ball.x, active.state.ball.y), (400.0, 300.0));
    }

    #[test]
    fn test_leaderboard_is_stored_in_any_phase() {
        let mut client = MatchClient::new(Playfield::default());
        assert_eq!(client.request_leaderboard(), vec![ClientMessage::GetLeaderboard]);

        client.handle(ServerMessage::Leaderboard(serde_json::json!([{"name": "ada"}])));

        assert_eq!(client.leaderboard().unwrap()[0]["name"], "ada");
        assert!(matches!(client.phase(), Phase::Idle));
    }
}
