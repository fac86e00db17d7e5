mod model;

use std::sync::Arc;

use dashmap::DashMap;
use teloxide::types::UserId;

pub use model::UserSession;

/// In-memory user sessions, one per Telegram user.
#[derive(Clone, Default)]
pub struct SessionService {
    sessions: Arc<DashMap<UserId, UserSession>>,
}

impl SessionService {
    pub fn new() -> Self {
        info!("Initializing session service");
        Self::default()
    }

    pub fn get(&self, user_id: UserId) -> Option<UserSession> {
        self.sessions.get(&user_id).map(|s| s.value().clone())
    }

    pub fn get_or_create(&self, user_id: UserId) -> UserSession {
        self.sessions
            .entry(user_id)
            .or_insert_with(|| {
                debug!("Creating session for user {}", user_id);
                UserSession::new(user_id)
            })
            .value()
            .clone()
    }

    /// Applies `f` to the user's session, creating it first if needed.
    pub fn update<F>(&self, user_id: UserId, f: F) -> UserSession
    where
        F: FnOnce(&mut UserSession),
    {
        let mut entry = self.sessions.entry(user_id).or_insert_with(|| UserSession::new(user_id));
        f(entry.value_mut());
        entry.value().clone()
    }

    pub fn auth_token(&self, user_id: UserId) -> Option<String> {
        self.sessions.get(&user_id).and_then(|s| s.auth_token.clone())
    }

    pub fn clear_token(&self, user_id: UserId) {
        if let Some(mut session) = self.sessions.get_mut(&user_id) {
            session.auth_token = None;
        }
    }

    pub fn remove(&self, user_id: UserId) -> Option<UserSession> {
        self.sessions.remove(&user_id).map(|(_, session)| session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::api::{AuthResponse, Tier, UserProfile};

    #[test]
    fn test_get_or_create_is_idempotent() {
        let service = SessionService::new();
        assert!(service.get(UserId(1)).is_none());

        let first = service.get_or_create(UserId(1));
        let second = service.get_or_create(UserId(1));

        assert_eq!(first.created_at, second.created_at);
        assert_eq!(service.sessions.len(), 1);
        assert!(!first.is_authenticated());
    }

    #[test]
    fn test_login_and_logout() {
        let service = SessionService::new();
        let auth = AuthResponse {
            access_token: Some("tok".into()),
            user: UserProfile {
                username: Some("johndoe".into()),
                tier: Tier::Premium,
                total_scans: 12,
                ..Default::default()
            },
        };

        let session = service.update(UserId(1), |s| s.apply_login("user@example.com", &auth));
        assert_eq!(session.email.as_deref(), Some("user@example.com"));
        assert_eq!(session.username.as_deref(), Some("johndoe"));
        assert_eq!(session.tier, Tier::Premium);
        assert_eq!(service.auth_token(UserId(1)).as_deref(), Some("tok"));

        service.update(UserId(1), UserSession::record_scan);
        assert_eq!(service.get(UserId(1)).unwrap().total_scans, 13);

        service.clear_token(UserId(1));
        assert!(service.auth_token(UserId(1)).is_none());

        assert!(service.remove(UserId(1)).is_some());
        assert!(service.get(UserId(1)).is_none());
    }
}
