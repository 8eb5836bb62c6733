use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;
use tracing::warn;

use crate::config::KeyBindings;

/// Discrete user intents. Paddle movement is not an action: it is tracked
/// as held-key state in [`KeyState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputAction {
    Quit,
    Type(char),
    Backspace,
    Submit,
    Surrender,
    PlayAgain,
    Leaderboard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaddleDirection {
    Up,
    Down,
    Still,
}

#[derive(Debug, Default, Clone, Copy)]
struct HeldKey {
    held: bool,
    frames_left: u32,
}

/// Which paddle keys are currently held.
///
/// Terminals that never report key releases only send repeated presses, so
/// until a release has been seen a key counts as held for `hold_frames`
/// frames after its last press.
#[derive(Debug, Clone)]
pub struct KeyState {
    up: HeldKey,
    down: HeldKey,
    hold_frames: u32,
    releases_reported: bool,
}

impl KeyState {
    pub fn new(hold_frames: u32) -> Self {
        Self {
            up: HeldKey::default(),
            down: HeldKey::default(),
            hold_frames: hold_frames.max(1),
            releases_reported: false,
        }
    }

    pub fn press(&mut self, direction: PaddleDirection) {
        let hold_frames = self.hold_frames;
        if let Some(key) = self.key_mut(direction) {
            key.held = true;
            key.frames_left = hold_frames;
        }
    }

    pub fn release(&mut self, direction: PaddleDirection) {
        self.releases_reported = true;
        if let Some(key) = self.key_mut(direction) {
            key.held = false;
            key.frames_left = 0;
        }
    }

    /// Called once per frame after the paddle has been moved.
    pub fn end_frame(&mut self) {
        if self.releases_reported {
            return;
        }
        for key in [&mut self.up, &mut self.down] {
            key.frames_left = key.frames_left.saturating_sub(1);
            if key.frames_left == 0 {
                key.held = false;
            }
        }
    }

    pub fn direction(&self) -> PaddleDirection {
        match (self.up.held, self.down.held) {
            (true, false) => PaddleDirection::Up,
            (false, true) => PaddleDirection::Down,
            _ => PaddleDirection::Still,
        }
    }

    fn key_mut(&mut self, direction: PaddleDirection) -> Option<&mut HeldKey> {
        match direction {
            PaddleDirection::Up => Some(&mut self.up),
            PaddleDirection::Down => Some(&mut self.down),
            PaddleDirection::Still => None,
        }
    }
}

/// Key bindings parsed from their config strings.
#[derive(Debug, Clone)]
pub struct Bindings {
    pub paddle_up: [KeyCode; 2],
    pub paddle_down: [KeyCode; 2],
    pub surrender: KeyCode,
    pub quit: KeyCode,
    pub play_again: KeyCode,
    pub leaderboard: KeyCode,
}

impl Bindings {
    /// Unparseable entries fall back to the default binding.
    pub fn from_config(config: &KeyBindings) -> Self {
        let defaults = KeyBindings::default();
        let resolve = |name: &str, fallback: &str| {
            parse_key(name).unwrap_or_else(|| {
                warn!("Unknown key binding {:?}, using {:?}", name, fallback);
                parse_key(fallback).unwrap_or(KeyCode::Null)
            })
        };

        Self {
            paddle_up: [
                resolve(&config.paddle_up, &defaults.paddle_up),
                resolve(&config.alt_paddle_up, &defaults.alt_paddle_up),
            ],
            paddle_down: [
                resolve(&config.paddle_down, &defaults.paddle_down),
                resolve(&config.alt_paddle_down, &defaults.alt_paddle_down),
            ],
            surrender: resolve(&config.surrender, &defaults.surrender),
            quit: resolve(&config.quit, &defaults.quit),
            play_again: resolve(&config.play_again, &defaults.play_again),
            leaderboard: resolve(&config.leaderboard, &defaults.leaderboard),
        }
    }

    fn paddle_direction(&self, code: KeyCode) -> Option<PaddleDirection> {
        if self.paddle_up.iter().any(|b| key_matches(*b, code)) {
            Some(PaddleDirection::Up)
        } else if self.paddle_down.iter().any(|b| key_matches(*b, code)) {
            Some(PaddleDirection::Down)
        } else {
            None
        }
    }
}

/// Parse a binding name: "Up", "Down", "Left", "Right", "Enter", "Esc",
/// "Tab", "Space", "Backspace", or a single character.
pub fn parse_key(name: &str) -> Option<KeyCode> {
    let code = match name.to_ascii_lowercase().as_str() {
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "space" => KeyCode::Char(' '),
        "backspace" => KeyCode::Backspace,
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c.to_ascii_lowercase()),
                _ => return None,
            }
        }
    };
    Some(code)
}

fn key_matches(binding: KeyCode, code: KeyCode) -> bool {
    match (binding, code) {
        (KeyCode::Char(b), KeyCode::Char(c)) => b.eq_ignore_ascii_case(&c),
        (b, c) => b == c,
    }
}

/// Translate one key event. While `text_entry` is set, characters are typed
/// instead of being matched against bindings.
pub fn translate_key(
    key: KeyEvent,
    bindings: &Bindings,
    text_entry: bool,
    keys: &mut KeyState,
) -> Option<InputAction> {
    if key.kind != KeyEventKind::Release
        && key.modifiers.contains(KeyModifiers::CONTROL)
        && key_matches(KeyCode::Char('c'), key.code)
    {
        return Some(InputAction::Quit);
    }

    if !text_entry {
        if let Some(direction) = bindings.paddle_direction(key.code) {
            match key.kind {
                KeyEventKind::Release => keys.release(direction),
                _ => keys.press(direction),
            }
            return None;
        }
    }

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if text_entry {
        return match key.code {
            KeyCode::Esc => Some(InputAction::Quit),
            KeyCode::Enter => Some(InputAction::Submit),
            KeyCode::Backspace => Some(InputAction::Backspace),
            code if key_matches(bindings.leaderboard, code) && !matches!(code, KeyCode::Char(_)) => {
                Some(InputAction::Leaderboard)
            }
            KeyCode::Char(c) => Some(InputAction::Type(c)),
            _ => None,
        };
    }

    let code = key.code;
    if code == KeyCode::Esc || key_matches(bindings.quit, code) {
        Some(InputAction::Quit)
    } else if key_matches(bindings.surrender, code) {
        Some(InputAction::Surrender)
    } else if key_matches(bindings.play_again, code) {
        Some(InputAction::PlayAgain)
    } else if key_matches(bindings.leaderboard, code) {
        Some(InputAction::Leaderboard)
    } else {
        None
    }
}

/// Drain all pending terminal events without blocking.
pub fn poll_input(
    bindings: &Bindings,
    text_entry: bool,
    keys: &mut KeyState,
) -> Result<Vec<InputAction>, std::io::Error> {
    let mut actions = Vec::new();

    while event::poll(Duration::from_millis(0))? {
        if let Event::Key(key) = event::read()? {
            if let Some(action) = translate_key(key, bindings, text_entry, keys) {
                actions.push(action);
            }
        }
    }

    Ok(actions)
}
