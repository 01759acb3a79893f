//! Test fixtures providing pre-built test objects
//!
//! Commonly used sessions, managers and settings, so test files do not each
//! rebuild the same configuration.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::models::Session;
use crate::session::{CookieConfig, CookieManager, SessionConfig, SessionManager};
use crate::settings::SessionVaultSettings;
use crate::utils::crypto::generate_token;

use super::constants::{TEST_CLIENT_IP, TEST_COOKIE_SECRET, TEST_USER_AGENT, TEST_USER_ID};
use super::mock::MemoryStore;

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    /// Create a fresh, never-stored anonymous session
    ///
    /// # Panics
    ///
    /// Panics if the OS random source is unavailable.
    #[must_use]
    pub fn session() -> Session {
        let token = generate_token().expect("OS random source should be available in tests");
        let mut session = Session::new(Uuid::new_v4().to_string(), token, Duration::hours(1));
        session.ip = Some(TEST_CLIENT_IP.to_string());
        session.user_agent = Some(TEST_USER_AGENT.to_string());
        session
    }

    /// Create a clean session owned by [`TEST_USER_ID`]
    #[must_use]
    pub fn authenticated_session() -> Session {
        let mut session = Self::session();
        session.set_user_id(TEST_USER_ID);
        session.clear_new();
        session.clear_dirty();
        session
    }

    /// Create an expired session for testing expiration logic
    #[must_use]
    pub fn expired_session() -> Session {
        let mut session = Self::session();
        session.created_at = Utc::now() - Duration::hours(3);
        session.last_active_at = Utc::now() - Duration::hours(2);
        session.expires_at = Utc::now() - Duration::hours(1);
        session
    }

    /// Create a session manager over an empty [`MemoryStore`]
    #[must_use]
    pub fn session_manager() -> (SessionManager, Arc<MemoryStore>) {
        Self::session_manager_with(SessionConfig::default())
    }

    /// Create a session manager with custom configuration
    #[must_use]
    pub fn session_manager_with(config: SessionConfig) -> (SessionManager, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (SessionManager::new(store.clone(), config), store)
    }

    /// Cookie configuration with a valid test secret
    #[must_use]
    pub fn cookie_config() -> CookieConfig {
        CookieConfig {
            secret: Some(TEST_COOKIE_SECRET.to_string()),
            ..CookieConfig::default()
        }
    }

    /// Create a cookie manager with a valid test secret
    #[must_use]
    pub fn cookie_manager() -> CookieManager {
        CookieManager::new(Self::cookie_config())
    }

    /// Create standard test settings
    #[must_use]
    pub fn settings() -> SessionVaultSettings {
        let mut settings = SessionVaultSettings::default();
        settings.cookies.secret = Some(TEST_COOKIE_SECRET.to_string());
        settings
    }
}
