use chrono::{DateTime, Utc};
use teloxide::types::UserId;

use crate::service::api::{AuthResponse, Tier};

/// What the bot remembers about a user between commands.
#[derive(Debug, Clone, PartialEq)]
pub struct UserSession {
    pub telegram_id: UserId,
    pub email: Option<String>,
    pub username: Option<String>,
    pub auth_token: Option<String>,
    pub tier: Tier,
    pub scans_today: u64,
    pub total_scans: u64,
    pub tdl_balance: f64,
    pub created_at: DateTime<Utc>,
}

impl UserSession {
    pub fn new(telegram_id: UserId) -> Self {
        Self {
            telegram_id,
            email: None,
            username: None,
            auth_token: None,
            tier: Tier::Free,
            scans_today: 0,
            total_scans: 0,
            tdl_balance: 0.0,
            created_at: Utc::now(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth_token.is_some()
    }

    pub fn apply_login(&mut self, email: &str, auth: &AuthResponse) {
        let user = &auth.user;
        self.email = Some(user.email.clone().unwrap_or_else(|| email.to_string()));
        if user.username.is_some() {
            self.username = user.username.clone();
        }
        self.auth_token = auth.access_token.clone();
        self.tier = user.tier;
        self.scans_today = user.scans_today;
        self.total_scans = user.total_scans;
        self.tdl_balance = user.tdl_balance;
    }

    pub fn record_scan(&mut self) {
        self.scans_today += 1;
        self.total_scans += 1;
    }
}
