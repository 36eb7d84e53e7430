//! Keyed session store.
//!
//! The map itself is only locked long enough to find or insert a slot. Each
//! slot carries its own async mutex, so calls for one thread identifier queue
//! up in arrival order while calls for other identifiers proceed untouched.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::{debug, info};

use super::model::{Session, SessionState, ThreadId};

type Slot = Arc<Mutex<Session>>;

/// Store of all live sessions, one entry per thread identifier.
pub struct SessionStore {
    slots: RwLock<HashMap<ThreadId, Slot>>,
    idle_timeout: Duration,
}

impl SessionStore {
    /// Create an empty store whose sessions become purgeable after
    /// `idle_timeout` without use.
    pub fn new(idle_timeout: Duration) -> Self {
        info!("Initializing SessionStore (idle timeout {:?})", idle_timeout);
        Self {
            slots: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    async fn slot(&self, thread_id: &ThreadId) -> Slot {
        if let Some(slot) = self.slots.read().await.get(thread_id) {
            return slot.clone();
        }

        let mut slots = self.slots.write().await;
        slots
            .entry(thread_id.clone())
            .or_insert_with(|| {
                debug!(thread_id = %thread_id, "Creating session");
                Arc::new(Mutex::new(Session::new(thread_id.clone())))
            })
            .clone()
    }

    /// Take the exclusive lock on a thread's session, creating it if absent.
    ///
    /// The guard keeps the session alive even if it is purged from the map
    /// while held.
    pub async fn lock(&self, thread_id: &ThreadId) -> OwnedMutexGuard<Session> {
        self.slot(thread_id).await.lock_owned().await
    }

    /// Snapshot of a thread's session, creating an empty one if absent.
    pub async fn get(&self, thread_id: &ThreadId) -> Session {
        self.lock(thread_id).await.clone()
    }

    /// Apply `mutator` to a thread's state under its lock.
    pub async fn update<F, R>(&self, thread_id: &ThreadId, mutator: F) -> R
    where
        F: FnOnce(&mut SessionState) -> R,
    {
        let mut session = self.lock(thread_id).await;
        let output = mutator(&mut session.state);
        session.touch();
        output
    }

    /// Whether a session exists for `thread_id`.
    pub async fn contains(&self, thread_id: &ThreadId) -> bool {
        self.slots.read().await.contains_key(thread_id)
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }

    /// Drop sessions idle for longer than the configured window.
    ///
    /// Sessions that are locked or referenced by an in-flight call are kept.
    /// Returns the number of purged sessions.
    pub async fn purge_idle(&self, now: DateTime<Utc>) -> usize {
        let mut slots = self.slots.write().await;
        let before = slots.len();

        slots.retain(|_, slot| {
            if Arc::strong_count(slot) > 1 {
                return true;
            }
            match slot.try_lock() {
                Ok(session) => !self.is_idle(&session, now),
                Err(_) => true,
            }
        });

        let purged = before - slots.len();
        if purged > 0 {
            info!("Purged {} idle session(s), {} remaining", purged, slots.len());
        }
        purged
    }

    fn is_idle(&self, session: &Session, now: DateTime<Utc>) -> bool {
        match (now - session.last_used_at).to_std() {
            Ok(elapsed) => elapsed > self.idle_timeout,
            // last use lies in the future relative to `now`
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::session::SessionMutation;

    fn thread(id: &str) -> ThreadId {
        ThreadId::parse(id).unwrap()
    }

    fn store() -> SessionStore {
        SessionStore::new(Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_get_creates_empty_session() {
        let store = store();
        assert!(!store.contains(&thread("new")).await);

        let session = store.get(&thread("new")).await;
        assert_eq!(session.thread_id, thread("new"));
        assert!(session.state.selected_location_ids.is_empty());
        assert!(store.contains(&thread("new")).await);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_is_visible_to_get() {
        let store = store();
        let count = store
            .update(&thread("t1"), |state| {
                SessionMutation::SelectLocations(vec!["A".into(), "B".into()]).apply(state);
                state.selected_location_ids.len()
            })
            .await;
        assert_eq!(count, 2);

        let session = store.get(&thread("t1")).await;
        assert_eq!(session.state.selected_location_ids, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = store();
        store
            .update(&thread("a"), |state| {
                state.last_translated_query = Some("QA".into())
            })
            .await;

        let other = store.get(&thread("b")).await;
        assert!(other.state.last_translated_query.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_updates_on_one_thread_are_not_lost() {
        let store = Arc::new(store());
        let mut handles = Vec::new();
        for i in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .update(&thread("shared"), |state| {
                        state.selected_location_ids.push(format!("loc{}", i))
                    })
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let session = store.get(&thread("shared")).await;
        assert_eq!(session.state.selected_location_ids.len(), 32);
    }

    #[tokio::test]
    async fn test_lock_serializes_same_thread() {
        let store = store();
        let busy = thread("busy");
        let free = thread("free");
        let guard = store.lock(&busy).await;

        let second = tokio::time::timeout(Duration::from_millis(50), store.lock(&busy));
        assert!(second.await.is_err(), "second lock must wait");

        let other = tokio::time::timeout(Duration::from_millis(50), store.lock(&free));
        assert!(other.await.is_ok(), "other threads must not wait");
        drop(guard);
    }

    #[tokio::test]
    async fn test_purge_drops_only_idle_sessions() {
        let store = SessionStore::new(Duration::from_secs(10));
        store.get(&thread("old")).await;
        store.get(&thread("fresh")).await;
        {
            let mut old = store.lock(&thread("old")).await;
            old.last_used_at = Utc::now() - chrono::Duration::seconds(60);
        }

        let purged = store.purge_idle(Utc::now()).await;
        assert_eq!(purged, 1);
        assert!(!store.contains(&thread("old")).await);
        assert!(store.contains(&thread("fresh")).await);
    }

    #[tokio::test]
    async fn test_purge_keeps_held_sessions() {
        let store = SessionStore::new(Duration::from_secs(10));
        let mut guard = store.lock(&thread("held")).await;
        guard.last_used_at = Utc::now() - chrono::Duration::seconds(60);

        assert_eq!(store.purge_idle(Utc::now()).await, 0);
        assert!(store.contains(&thread("held")).await);
        drop(guard);

        assert_eq!(store.purge_idle(Utc::now()).await, 1);
        assert!(store.is_empty().await);
    }

    #[test]
    fn test_future_last_use_is_not_idle() {
        let store = SessionStore::new(Duration::from_secs(1));
        let purged = tokio_test::block_on(async {
            store.get(&thread("skewed")).await;
            store.purge_idle(Utc::now() - chrono::Duration::seconds(30)).await
        });
        assert_eq!(purged, 0);
    }
}
