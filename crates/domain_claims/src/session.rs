//! Moderation sessions
//!
//! Ephemeral per-moderator state for two-step actions: a moderator presses
//! "reject" or "note" on a claim and their next free-text reply is
//! correlated back to that claim. One active session per moderator;
//! beginning a second replaces the first. Sessions expire after a bounded
//! TTL so a moderator who walks away never gets a stale reply applied.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use core_kernel::{ClaimId, UserId};

/// What the moderator's next reply will be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingAction {
    /// Reply is the rejection reason; finalizes the rejection
    Reject,
    /// Reply is an annotation on the claim
    Note,
}

/// An in-flight two-step moderator action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationSession {
    pub moderator: UserId,
    pub claim_id: ClaimId,
    pub action: PendingAction,
    pub started_at: DateTime<Utc>,
}

/// In-memory session map, keyed by moderator
///
/// Not persisted: a restart cancelling in-flight reply prompts is acceptable,
/// the moderator just presses the button again.
#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: HashMap<UserId, ModerationSession>,
}

/// Default session lifetime
pub const DEFAULT_TTL_SECS: i64 = 600;

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: HashMap::new(),
        }
    }

    /// Starts a session, replacing any existing one for this moderator
    pub fn begin(
        &mut self,
        moderator: UserId,
        claim_id: ClaimId,
        action: PendingAction,
    ) -> Option<ModerationSession> {
        let session = ModerationSession {
            moderator,
            claim_id,
            action,
            started_at: Utc::now(),
        };
        let replaced = self.sessions.insert(moderator, session);
        if let Some(ref old) = replaced {
            debug!(%moderator, claim_id = %old.claim_id, "replaced active moderation session");
        }
        replaced
    }

    /// Consumes the moderator's active session, if any and not expired
    pub fn resolve(&mut self, moderator: UserId) -> Option<ModerationSession> {
        let session = self.sessions.remove(&moderator)?;
        if self.is_expired(&session) {
            debug!(%moderator, claim_id = %session.claim_id, "dropped expired moderation session");
            return None;
        }
        Some(session)
    }

    /// Drops the moderator's active session; returns whether one existed
    pub fn cancel(&mut self, moderator: UserId) -> bool {
        self.sessions.remove(&moderator).is_some()
    }

    /// Removes all expired sessions
    pub fn purge_expired(&mut self) {
        let ttl = self.ttl;
        let now = Utc::now();
        self.sessions
            .retain(|_, session| now - session.started_at <= ttl);
    }

    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }

    fn is_expired(&self, session: &ModerationSession) -> bool {
        Utc::now() - session.started_at > self.ttl
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_TTL_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moderator() -> UserId {
        UserId::new(9001)
    }

    #[test]
    fn test_begin_and_resolve() {
        let mut store = SessionStore::default();
        let claim_id = ClaimId::new_v7();

        store.begin(moderator(), claim_id, PendingAction::Reject);
        let session = store.resolve(moderator()).expect("active session");

        assert_eq!(session.claim_id, claim_id);
        assert_eq!(session.action, PendingAction::Reject);
        // Consumed: a second resolve finds nothing
        assert!(store.resolve(moderator()).is_none());
    }

    #[test]
    fn test_resolve_without_session() {
        let mut store = SessionStore::default();
        assert!(store.resolve(moderator()).is_none());
    }

    #[test]
    fn test_begin_replaces_existing() {
        let mut store = SessionStore::default();
        let first = ClaimId::new_v7();
        let second = ClaimId::new_v7();

        store.begin(moderator(), first, PendingAction::Reject);
        let replaced = store.begin(moderator(), second, PendingAction::Note);

        assert_eq!(replaced.unwrap().claim_id, first);
        assert_eq!(store.resolve(moderator()).unwrap().claim_id, second);
    }

    #[test]
    fn test_sessions_are_per_moderator() {
        let mut store = SessionStore::default();
        let other = UserId::new(9002);
        let claim_id = ClaimId::new_v7();

        store.begin(moderator(), claim_id, PendingAction::Note);

        assert!(store.resolve(other).is_none());
        assert!(store.resolve(moderator()).is_some());
    }

    #[test]
    fn test_cancel() {
        let mut store = SessionStore::default();
        store.begin(moderator(), ClaimId::new_v7(), PendingAction::Note);

        assert!(store.cancel(moderator()));
        assert!(!store.cancel(moderator()));
        assert!(store.resolve(moderator()).is_none());
    }

    #[test]
    fn test_expired_session_is_not_resolved() {
        let mut store = SessionStore::new(Duration::seconds(0));
        store.begin(moderator(), ClaimId::new_v7(), PendingAction::Reject);

        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(store.resolve(moderator()).is_none());
    }

    #[test]
    fn test_purge_expired() {
        let mut store = SessionStore::new(Duration::seconds(0));
        store.begin(moderator(), ClaimId::new_v7(), PendingAction::Reject);
        store.begin(UserId::new(9002), ClaimId::new_v7(), PendingAction::Note);

        std::thread::sleep(std::time::Duration::from_millis(5));
        store.purge_expired();

        assert_eq!(store.active_count(), 0);
    }
}
