//! Mock objects and fake implementations for testing
//!
//! [`MemoryStore`] is a complete [`SessionStore`] kept in process memory. It
//! stores sessions serialized, so every `get` returns a clean copy exactly as a
//! real backend would.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::Session;
use crate::session::store::{SessionStore, StoreError};

/// In-memory session store with failure injection
#[derive(Default)]
pub struct MemoryStore {
    sessions: Mutex<HashMap<String, String>>,
    failing: AtomicBool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with a backend error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Insert a record directly, bypassing the failure switch
    ///
    /// # Panics
    ///
    /// Panics if the session cannot be serialized or the lock is poisoned.
    pub fn insert(&self, session: &Session) {
        let json = serde_json::to_string(session).expect("session should serialize");
        self.lock().insert(session.id().to_string(), json);
    }

    /// Number of stored sessions, expired ones included
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.sessions
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Backend(anyhow!("memory store unavailable")));
        }
        Ok(())
    }

    fn decode(json: &str) -> Result<Session, StoreError> {
        serde_json::from_str(json).map_err(|e| StoreError::Backend(e.into()))
    }

    fn encode(session: &Session) -> Result<String, StoreError> {
        serde_json::to_string(session).map_err(|e| StoreError::Backend(e.into()))
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create(&self, session: &Session) -> Result<(), StoreError> {
        self.check_available()?;
        let json = Self::encode(session)?;

        let mut sessions = self.lock();
        if sessions.contains_key(session.id()) {
            return Err(StoreError::Backend(anyhow!(
                "session {} already exists",
                session.id()
            )));
        }
        sessions.insert(session.id().to_string(), json);
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Session, StoreError> {
        self.check_available()?;

        let sessions = self.lock();
        for json in sessions.values() {
            let session = Self::decode(json)?;
            if session.token() == token {
                if session.is_expired() {
                    return Err(StoreError::Expired);
                }
                return Ok(session);
            }
        }
        Err(StoreError::NotFound)
    }

    async fn update(&self, session: &Session) -> Result<(), StoreError> {
        self.check_available()?;
        let json = Self::encode(session)?;

        let mut sessions = self.lock();
        match sessions.get_mut(session.id()) {
            Some(existing) => {
                *existing = json;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.check_available()?;
        self.lock().remove(id);
        Ok(())
    }

    async fn delete_by_user_id(&self, user_id: &str) -> Result<(), StoreError> {
        self.check_available()?;

        let mut sessions = self.lock();
        let mut owned = Vec::new();
        for (id, json) in sessions.iter() {
            if Self::decode(json)?.user_id() == Some(user_id) {
                owned.push(id.clone());
            }
        }
        for id in owned {
            sessions.remove(&id);
        }
        Ok(())
    }

    async fn touch(&self, id: &str, last_active_at: DateTime<Utc>) -> Result<(), StoreError> {
        self.check_available()?;

        let mut sessions = self.lock();
        let json = sessions.get_mut(id).ok_or(StoreError::NotFound)?;
        let mut session = Self::decode(json)?;
        session.last_active_at = last_active_at;
        *json = Self::encode(&session)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestFixtures;

    #[tokio::test]
    async fn test_get_returns_clean_copy() {
        let store = MemoryStore::new();
        let session = TestFixtures::session();
        assert!(session.is_new());

        store.create(&session).await.unwrap();
        let loaded = store.get(session.token()).await.unwrap();
        assert_eq!(loaded.id(), session.id());
        assert!(!loaded.is_new());
        assert!(!loaded.is_dirty());
    }

    #[tokio::test]
    async fn test_duplicate_create_rejected() {
        let store = MemoryStore::new();
        let session = TestFixtures::session();
        store.create(&session).await.unwrap();
        assert!(matches!(
            store.create(&session).await,
            Err(StoreError::Backend(_))
        ));
    }

    #[tokio::test]
    async fn test_expired_and_missing() {
        let store = MemoryStore::new();
        let expired = TestFixtures::expired_session();
        store.insert(&expired);

        assert!(matches!(
            store.get(expired.token()).await,
            Err(StoreError::Expired)
        ));
        assert!(matches!(
            store.get("unknown").await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store.touch("unknown", Utc::now()).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_by_user_id_keeps_others() {
        let store = MemoryStore::new();
        let owned = TestFixtures::authenticated_session();
        let anonymous = TestFixtures::session();
        store.insert(&owned);
        store.insert(&anonymous);

        store.delete_by_user_id("user-42").await.unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.get(anonymous.token()).await.is_ok());
    }

    #[tokio::test]
    async fn test_failure_switch() {
        let store = MemoryStore::new();
        let session = TestFixtures::session();
        store.set_failing(true);

        assert!(matches!(
            store.create(&session).await,
            Err(StoreError::Backend(_))
        ));
        assert!(store.is_empty());

        store.set_failing(false);
        store.create(&session).await.unwrap();
        assert_eq!(store.len(), 1);
    }
}
