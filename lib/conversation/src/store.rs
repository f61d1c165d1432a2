//! Session store with per-user exclusivity.

use crate::state::Session;
use hero_guide_core::UserId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Owns one session per user identity.
///
/// [`SessionStore::acquire`] hands out an owned guard; a second event for the
/// same user waits until the first guard is dropped, while other users
/// proceed in parallel.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<UserId, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the user's session, creating an idle one on first reference.
    pub async fn acquire(&self, user_id: UserId) -> OwnedMutexGuard<Session> {
        let slot = {
            let mut sessions = self.sessions.lock().await;
            Arc::clone(
                sessions
                    .entry(user_id)
                    .or_insert_with(|| Arc::new(Mutex::new(Session::new(user_id)))),
            )
        };
        slot.lock_owned().await
    }

    /// Resets the user's session if it exists.
    pub async fn reset(&self, user_id: UserId) {
        let slot = self.sessions.lock().await.get(&user_id).cloned();
        if let Some(slot) = slot {
            slot.lock().await.reset();
        }
    }

    /// Number of sessions created so far.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Returns true if no session was created yet.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
