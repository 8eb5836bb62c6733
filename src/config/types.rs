// netpong configuration types
// Every section falls back to its defaults when missing from the file

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub keybindings: KeyBindings,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    // Match coordinator WebSocket URL
    pub server_url: String,

    // Give up connecting after this many seconds (no retry)
    pub connect_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            server_url: "ws://127.0.0.1:3000/pong".to_string(),
            connect_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PhysicsConfig {
    // Playfield in virtual units; both players must agree on these
    pub field_width: f32,
    pub field_height: f32,

    pub paddle_width: f32,
    pub paddle_height: f32,
    pub ball_radius: f32,

    // Units per frame
    pub ball_speed: f32,
    pub paddle_speed: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            field_width: 800.0,
            field_height: 600.0,
            paddle_width: 10.0,
            paddle_height: 100.0,
            ball_radius: 10.0,
            ball_speed: 5.0,
            paddle_speed: 8.0,
        }
    }
}

impl PhysicsConfig {
    /// Every value must be finite and positive, and paddles must fit the field.
    pub fn validate(&self) -> Result<(), String> {
        let values = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("ball_radius", self.ball_radius),
            ("ball_speed", self.ball_speed),
            ("paddle_speed", self.paddle_speed),
        ];
        for (name, value) in values {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{} must be a positive number, got {}", name, value));
            }
        }
        if self.paddle_height > self.field_height {
            return Err("paddle_height is larger than field_height".to_string());
        }
        if self.paddle_width > self.field_width {
            return Err("paddle_width is larger than field_width".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KeyBindings {
    pub paddle_up: String,
    pub paddle_down: String,
    pub alt_paddle_up: String,
    pub alt_paddle_down: String,
    pub surrender: String,
    pub quit: String,
    pub play_again: String,
    pub leaderboard: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            paddle_up: "Up".to_string(),
            paddle_down: "Down".to_string(),
            alt_paddle_up: "W".to_string(),
            alt_paddle_down: "S".to_string(),
            surrender: "X".to_string(),
            quit: "Q".to_string(),
            play_again: "Enter".to_string(),
            leaderboard: "Tab".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub target_fps: u64,

    // Frames a paddle key stays held on terminals without release events
    pub key_hold_frames: u32,

    // RGB 0-255
    pub field_color: [u8; 3],
    pub accent_color: [u8; 3],
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            key_hold_frames: 12,
            field_color: [255, 255, 255],
            accent_color: [0, 200, 255],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    // tracing level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    // Log file written when --debug is given (the terminal belongs to the UI)
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: std::env::temp_dir()
                .join("netpong-debug.log")
                .display()
                .to_string(),
        }
    }
}
