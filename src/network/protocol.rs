// netpong wire protocol
// One JSON object per WebSocket text frame: {"event": "<name>", "data": {...}}
// Events without a payload omit "data".

use serde::{Deserialize, Serialize};

use crate::game::{BallState, ScoreState, Side};

/// Events this client sends to the match coordinator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Ask to be registered under a display name
    Register { name: String },

    /// Ask to be queued for a match
    FindGame,

    /// Our paddle's top edge, sent every frame
    PaddleMove { y: f32 },

    /// Authoritative ball state (left side only)
    BallUpdate(BallState),

    /// Score after a goal detected on the left side
    Score(ScoreState),

    Surrender,

    GetLeaderboard,
}

/// Events the match coordinator sends to this client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Registration accepted
    Registered { rating: i32 },

    /// Queued, no opponent yet
    Waiting,

    /// Paired with an opponent
    GameStart { side: Side, opponent: String },

    /// Relayed `paddleMove` from the opponent
    OpponentPaddleMove { y: f32 },

    /// Relayed ball state from the left side
    BallUpdate(BallState),

    /// Confirmed score
    ScoreUpdate(ScoreState),

    GameOver {
        won: bool,
        #[serde(rename = "ratingChange")]
        rating_change: i32,
    },

    OpponentDisconnected,

    /// Reply to `getLeaderboard`; the payload shape is up to the coordinator
    Leaderboard(serde_json::Value),
}

impl ClientMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl ServerMessage {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Wire name of the event, for logging
    pub fn event_name(&self) -> &'static str {
        match self {
            ServerMessage::Registered { .. } => "registered",
            ServerMessage::Waiting => "waiting",
            ServerMessage::GameStart { .. } => "gameStart",
            ServerMessage::OpponentPaddleMove { .. } => "opponentPaddleMove",
            ServerMessage::BallUpdate(_) => "ballUpdate",
            ServerMessage::ScoreUpdate(_) => "scoreUpdate",
            ServerMessage::GameOver { .. } => "gameOver",
            ServerMessage::OpponentDisconnected => "opponentDisconnected",
            ServerMessage::Leaderboard(_) => "leaderboard",
        }
    }
}
