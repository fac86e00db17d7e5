pub mod model;

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use teloxide::types::UserId;
use tokio::sync::{Mutex, OwnedMutexGuard};

pub use model::{DialogueState, Flow};

#[derive(Debug)]
pub struct DialogueEntry {
    state: DialogueState,
    last_activity: DateTime<Utc>,
}

impl Default for DialogueEntry {
    fn default() -> Self {
        Self {
            state: DialogueState::Idle,
            last_activity: Utc::now(),
        }
    }
}

/// Per-user conversation state. Each user has exactly one entry, guarded by
/// its own mutex so messages from the same user are handled one at a time
/// while different users proceed in parallel.
#[derive(Clone)]
pub struct DialogueService {
    entries: Arc<DashMap<UserId, Arc<Mutex<DialogueEntry>>>>,
    timeout: TimeDelta,
}

impl DialogueService {
    pub fn new(timeout: Duration) -> Self {
        info!("Initializing dialogue service (timeout: {}s)", timeout.as_secs());
        Self {
            entries: Arc::new(DashMap::new()),
            timeout: TimeDelta::from_std(timeout).unwrap_or(TimeDelta::MAX),
        }
    }

    /// Locks the user's dialogue until the returned guard is dropped.
    /// A flow left untouched for longer than the timeout comes back as
    /// `Idle`, with the abandoned step kept in `DialogueGuard::expired_from`.
    pub async fn acquire(&self, user_id: UserId) -> DialogueGuard {
        let cell = Arc::clone(
            self.entries
                .entry(user_id)
                .or_insert_with(|| Arc::new(Mutex::new(DialogueEntry::default())))
                .value(),
        );

        let mut guard = cell.lock_owned().await;

        let expired = !guard.state.is_idle() && Utc::now() - guard.last_activity > self.timeout;
        let expired_from = if expired {
            info!("Dialogue {} of user {} expired", guard.state, user_id);
            Some(std::mem::take(&mut guard.state))
        } else {
            None
        };

        DialogueGuard {
            user_id,
            guard,
            expired_from,
        }
    }

    /// Drops idle and expired entries nobody is currently using.
    pub fn cleanup_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.entries.len();

        self.entries.retain(|_, cell| {
            // a clone outside the map means a handler holds or awaits the lock
            if Arc::strong_count(cell) > 1 {
                return true;
            }
            match cell.try_lock() {
                Ok(entry) => !entry.state.is_idle() && now - entry.last_activity <= self.timeout,
                Err(_) => true,
            }
        });

        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

pub struct DialogueGuard {
    user_id: UserId,
    guard: OwnedMutexGuard<DialogueEntry>,
    expired_from: Option<DialogueState>,
}

impl DialogueGuard {
    pub fn state(&self) -> &DialogueState {
        &self.guard.state
    }

    pub fn expired(&self) -> bool {
        self.expired_from.is_some()
    }

    /// The step the user was at before the flow timed out.
    pub fn expired_from(&self) -> Option<&DialogueState> {
        self.expired_from.as_ref()
    }

    pub fn update(&mut self, state: DialogueState) {
        if self.guard.state != state {
            debug!("Dialogue of user {}: {} -> {}", self.user_id, self.guard.state, state);
        }
        self.guard.state = state;
        self.touch();
    }

    /// Back to `Idle`, returning whatever was collected.
    pub fn reset(&mut self) -> DialogueState {
        let previous = std::mem::take(&mut self.guard.state);
        if !previous.is_idle() {
            debug!("Dialogue of user {}: {} -> IDLE", self.user_id, previous);
        }
        self.touch();
        previous
    }

    pub fn touch(&mut self) {
        self.guard.last_activity = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_single_entry_per_user() {
        let service = DialogueService::new(Duration::from_secs(60));

        let mut guard = service.acquire(UserId(1)).await;
        guard.update(DialogueState::RegisterEmail);
        drop(guard);

        let mut guard = service.acquire(UserId(1)).await;
        assert_eq!(guard.state(), &DialogueState::RegisterEmail);
        guard.update(DialogueState::ScanAddress);
        drop(guard);

        let guard = service.acquire(UserId(1)).await;
        assert_eq!(guard.state(), &DialogueState::ScanAddress);
        drop(guard);

        assert_eq!(service.len(), 1);
    }

    #[tokio::test]
    async fn test_reset_returns_collected_fields() {
        let service = DialogueService::new(Duration::from_secs(60));
        let mut guard = service.acquire(UserId(1)).await;
        guard.update(DialogueState::LoginPassword {
            email: "user@example.com".into(),
        });

        let previous = guard.reset();
        assert_eq!(
            previous,
            DialogueState::LoginPassword {
                email: "user@example.com".into()
            }
        );
        assert!(guard.state().is_idle());
        assert!(guard.state().collected_fields().is_empty());
    }

    #[tokio::test]
    async fn test_same_user_is_serialized() {
        let service = DialogueService::new(Duration::from_secs(60));
        let guard = service.acquire(UserId(1)).await;

        let contender = service.clone();
        let blocked = tokio::time::timeout(Duration::from_millis(50), contender.acquire(UserId(1))).await;
        assert!(blocked.is_err());

        // another user is not blocked
        let other = tokio::time::timeout(Duration::from_millis(50), service.acquire(UserId(2))).await;
        assert!(other.is_ok());

        drop(guard);
        let unblocked = tokio::time::timeout(Duration::from_millis(50), service.acquire(UserId(1))).await;
        assert!(unblocked.is_ok());
    }

    #[tokio::test]
    async fn test_expired_flow_comes_back_idle() {
        let service = DialogueService::new(Duration::from_millis(10));
        let mut guard = service.acquire(UserId(1)).await;
        guard.update(DialogueState::ScanTier {
            address: "abc".into(),
        });
        drop(guard);

        tokio::time::sleep(Duration::from_millis(30)).await;

        let guard = service.acquire(UserId(1)).await;
        assert!(guard.expired());
        assert!(guard.state().is_idle());
        assert_eq!(
            guard.expired_from(),
            Some(&DialogueState::ScanTier {
                address: "abc".into()
            })
        );
        drop(guard);

        // expiry is reported once
        let guard = service.acquire(UserId(1)).await;
        assert!(!guard.expired());
        assert!(guard.expired_from().is_none());
    }

    #[tokio::test]
    async fn test_cleanup_skips_entries_in_use() {
        let service = DialogueService::new(Duration::from_millis(10));

        let mut stale = service.acquire(UserId(1)).await;
        stale.update(DialogueState::ScanAddress);
        drop(stale);

        let mut busy = service.acquire(UserId(2)).await;
        busy.update(DialogueState::LoginEmail);

        drop(service.acquire(UserId(3)).await);

        tokio::time::sleep(Duration::from_millis(30)).await;

        // user 1 expired, user 3 idle, user 2 still locked
        assert_eq!(service.cleanup_expired(), 2);
        assert_eq!(service.len(), 1);
        assert_eq!(busy.state(), &DialogueState::LoginEmail);
    }
}
