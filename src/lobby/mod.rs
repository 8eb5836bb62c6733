// Lobby screens: name entry, registration and matchmaking status, leaderboard

pub mod render;
pub mod state;

pub use render::render_lobby;
pub use state::LobbyState;
