//! Password gate in front of the admin editor.
//!
//! The secret is a plain string from the config, compared verbatim. There is
//! no hashing, expiry or rate limiting: anyone who can read the config can
//! unlock it, so this only keeps casual visitors out of the editor UI.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Locked,
    Unlocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateEvent {
    /// Transitioned locked -> unlocked
    Unlocked,
    AlreadyUnlocked,
    Rejected,
}

#[derive(Debug, Clone)]
pub struct AccessGate {
    secret: String,
    state: GateState,
    input: String,
    show_error: bool,
}

impl AccessGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            state: GateState::Locked,
            input: String::new(),
            show_error: false,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_unlocked(&self) -> bool {
        self.state == GateState::Unlocked
    }

    /// Whether the "wrong password" indicator is showing
    pub fn show_error(&self) -> bool {
        self.show_error
    }

    /// Last submitted input, kept until logout
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn submit(&mut self, input: &str) -> GateEvent {
        if self.is_unlocked() {
            return GateEvent::AlreadyUnlocked;
        }

        self.input = input.to_string();
        if input != self.secret {
            log::warn!("Admin login rejected");
            self.show_error = true;
            return GateEvent::Rejected;
        }

        self.state = GateState::Unlocked;
        self.show_error = false;
        log::info!("Admin panel unlocked");
        GateEvent::Unlocked
    }

    pub fn logout(&mut self) {
        self.state = GateState::Locked;
        self.input.clear();
        self.show_error = false;
        log::info!("Admin panel locked");
    }
}
