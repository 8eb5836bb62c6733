// Match client state machine
// Registration, matchmaking, per-frame play and match results

pub mod client;
pub mod match_session;

pub use client::{MatchClient, Profile};
pub use match_session::{ActiveMatch, GameOutcome, MatchSession, Phase};
