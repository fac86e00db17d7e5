use std::fmt;

/// Where a user currently is in a multi-step flow.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub enum DialogueState {
    #[default]
    Idle,
    // Registration
    RegisterEmail,
    RegisterPassword {
        email: String,
    },
    RegisterUsername {
        email: String,
        password: String,
    },
    // Login
    LoginEmail,
    LoginPassword {
        email: String,
    },
    // Scan
    ScanAddress,
    ScanTier {
        address: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    None,
    Register,
    Login,
    Scan,
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Flow::None => "NONE",
            Flow::Register => "REGISTER",
            Flow::Login => "LOGIN",
            Flow::Scan => "SCAN",
        };
        f.write_str(name)
    }
}

impl DialogueState {
    pub fn is_idle(&self) -> bool {
        matches!(self, DialogueState::Idle)
    }

    pub fn flow(&self) -> Flow {
        match self {
            DialogueState::Idle => Flow::None,
            DialogueState::RegisterEmail
            | DialogueState::RegisterPassword { .. }
            | DialogueState::RegisterUsername { .. } => Flow::Register,
            DialogueState::LoginEmail | DialogueState::LoginPassword { .. } => Flow::Login,
            DialogueState::ScanAddress | DialogueState::ScanTier { .. } => Flow::Scan,
        }
    }

    pub fn step(&self) -> &'static str {
        match self {
            DialogueState::Idle => "IDLE",
            DialogueState::RegisterEmail => "REGISTER_EMAIL",
            DialogueState::RegisterPassword { .. } => "REGISTER_PASSWORD",
            DialogueState::RegisterUsername { .. } => "REGISTER_USERNAME",
            DialogueState::LoginEmail => "LOGIN_EMAIL",
            DialogueState::LoginPassword { .. } => "LOGIN_PASSWORD",
            DialogueState::ScanAddress => "SCAN_ADDRESS",
            DialogueState::ScanTier { .. } => "SCAN_TIER",
        }
    }

    /// The next text message from the user is a password.
    pub fn awaits_password(&self) -> bool {
        matches!(
            self,
            DialogueState::RegisterPassword { .. } | DialogueState::LoginPassword { .. }
        )
    }

    /// Field names collected so far. Values are left out so passwords never
    /// reach the logs.
    pub fn collected_fields(&self) -> Vec<&'static str> {
        match self {
            DialogueState::RegisterPassword { .. } | DialogueState::LoginPassword { .. } => vec!["email"],
            DialogueState::RegisterUsername { .. } => vec!["email", "password"],
            DialogueState::ScanTier { .. } => vec!["address"],
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for DialogueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.flow(), self.step())
    }
}
