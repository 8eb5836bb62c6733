// Lobby state: the display name being typed before registering

pub const MAX_NAME_LEN: usize = 16;

pub struct LobbyState {
    /// Name input buffer
    pub name_input: String,
    /// Register as soon as the connection is up (name given on the command line)
    auto_submit: bool,
}

impl LobbyState {
    pub fn new(prefill: Option<String>) -> Self {
        let mut state = Self {
            name_input: String::new(),
            auto_submit: false,
        };
        if let Some(name) = prefill {
            for c in name.chars() {
                state.add_char(c);
            }
            state.auto_submit = !state.name_input.trim().is_empty();
        }
        state
    }

    /// Letters, digits, space, '-' and '_' only, up to [`MAX_NAME_LEN`]
    pub fn add_char(&mut self, c: char) {
        let allowed = c.is_alphanumeric() || c == ' ' || c == '-' || c == '_';
        if allowed && self.name_input.chars().count() < MAX_NAME_LEN {
            self.name_input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.name_input.pop();
    }

    /// True once, if the name should be submitted without the player pressing Enter
    pub fn take_auto_submit(&mut self) -> bool {
        std::mem::replace(&mut self.auto_submit, false)
    }
}
