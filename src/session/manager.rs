//! Session Manager - session lifecycle against a pluggable store
//!
//! The `SessionManager` is the single place where sessions are created, loaded,
//! re-keyed and bound to the response cookie. Storage is delegated to a
//! [`SessionStore`]; the manager itself holds only read-only configuration.
//!
//! ## Request flow
//!
//! 1. [`SessionManager::load_session`] reads the session cookie and looks the
//!    token up in the store, then checks the device fingerprint
//! 2. The caller mutates the session and persists it
//!    ([`SessionManager::persist_session`]) or re-keys it after login
//!    ([`SessionManager::authenticate_session`])
//! 3. [`SessionManager::save_session`] writes the (possibly new) token cookie
//!
//! ## Organization
//!
//! 1. **Configuration** - `SessionConfig` and construction
//! 2. **Loading** - reading sessions from requests
//! 3. **Lifecycle** - creation, rotation, persistence, revocation
//! 4. **Cookies** - writing and clearing the session cookie
//! 5. **Tests**

use std::sync::Arc;

use actix_web::cookie::{time::Duration as CookieDuration, Cookie};
use actix_web::{HttpRequest, HttpResponseBuilder};
use chrono::Utc;
use uuid::Uuid;

use crate::models::Session;
use crate::session::cookie::{append_cookie, SameSitePolicy};
use crate::session::errors::SessionError;
use crate::session::fingerprint::{
    compute_fingerprint, fingerprint_matches, FingerprintMode, FingerprintStrictness,
};
use crate::session::store::{SessionStore, StoreError};
use crate::session::utils::extract_client_info;
use crate::utils::crypto::generate_token;

/// Default session cookie name
pub const DEFAULT_SESSION_COOKIE_NAME: &str = "_session";

/// Default session lifetime: 30 days
pub const DEFAULT_SESSION_MAX_AGE_SECONDS: i64 = 30 * 24 * 60 * 60;

// =============================================================================
// 1. Configuration
// =============================================================================

/// Construction-time configuration for [`SessionManager`]
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    /// Session lifetime; sets both `expires_at` and the cookie `Max-Age`
    pub max_age_seconds: i64,
    pub domain: Option<String>,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSitePolicy,
    pub fingerprint_mode: FingerprintMode,
    pub fingerprint_strictness: FingerprintStrictness,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_SESSION_COOKIE_NAME.to_string(),
            max_age_seconds: DEFAULT_SESSION_MAX_AGE_SECONDS,
            domain: None,
            path: "/".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSitePolicy::Lax,
            fingerprint_mode: FingerprintMode::Disabled,
            fingerprint_strictness: FingerprintStrictness::Warn,
        }
    }
}

/// Session lifecycle coordinator
///
/// Cheap to clone; share it between workers as actix `web::Data`.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    config: SessionConfig,
}

impl SessionManager {
    /// Create a session manager over `store`
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, config: SessionConfig) -> Self {
        log::debug!(
            "Session manager configured: cookie '{}', max age {}s, fingerprint mode {}",
            config.cookie_name,
            config.max_age_seconds,
            config.fingerprint_mode
        );
        Self { store, config }
    }

    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Configured lifetime, rejected unless positive and representable from now
    fn session_lifetime(&self) -> Result<chrono::Duration, SessionError> {
        let seconds = self.config.max_age_seconds;
        chrono::Duration::try_seconds(seconds)
            .filter(|lifetime| *lifetime > chrono::Duration::zero())
            .filter(|lifetime| Utc::now().checked_add_signed(*lifetime).is_some())
            .ok_or_else(|| {
                log::error!("Session max age of {seconds}s is out of range");
                SessionError::InvalidMaxAge(seconds)
            })
    }
}

// =============================================================================
// 2. Loading
// =============================================================================

impl SessionManager {
    /// Load the session named by the request's session cookie
    ///
    /// Returns `Ok(None)` when the cookie is absent or empty.
    ///
    /// # Errors
    ///
    /// Store `NotFound`, `Expired` and backend errors are returned unchanged;
    /// `FingerprintMismatch` when the fingerprint differs under
    /// [`FingerprintStrictness::Reject`].
    pub async fn load_session(&self, req: &HttpRequest) -> Result<Option<Session>, SessionError> {
        let Some(token) = req
            .cookie(&self.config.cookie_name)
            .map(|cookie| cookie.value().to_string())
            .filter(|token| !token.is_empty())
        else {
            return Ok(None);
        };

        let session = self.store.get(&token).await?;

        // Stores are expected to report expiry, but the clock is authoritative
        if session.is_expired() {
            return Err(StoreError::Expired.into());
        }

        self.check_fingerprint(&session, req)?;

        Ok(Some(session))
    }

    /// Lenient variant of [`Self::load_session`] for request handlers
    ///
    /// Every failure degrades to "no session": absent conditions are logged at
    /// debug level, store faults at error level.
    pub async fn current_session(&self, req: &HttpRequest) -> Option<Session> {
        match self.load_session(req).await {
            Ok(session) => session,
            Err(e) if e.is_absent() => {
                log::debug!("No usable session: {e}");
                None
            }
            Err(e) => {
                log::error!("Failed to load session: {e}");
                None
            }
        }
    }

    fn check_fingerprint(&self, session: &Session, req: &HttpRequest) -> Result<(), SessionError> {
        let mode = self.config.fingerprint_mode;
        if mode == FingerprintMode::Disabled {
            return Ok(());
        }

        if fingerprint_matches(mode, session.fingerprint.as_deref(), req) {
            return Ok(());
        }

        match self.config.fingerprint_strictness {
            FingerprintStrictness::Reject => {
                log::warn!(
                    "Rejected session {}: device fingerprint mismatch (mode {mode})",
                    session.id()
                );
                Err(SessionError::FingerprintMismatch)
            }
            FingerprintStrictness::Warn => {
                log::warn!(
                    "Device fingerprint mismatch for session {} (mode {mode}), continuing",
                    session.id()
                );
                Ok(())
            }
        }
    }
}

// =============================================================================
// 3. Lifecycle
// =============================================================================

impl SessionManager {
    /// Create and persist a new anonymous session for the requesting client
    ///
    /// The returned session is clean: its in-memory state matches the store.
    ///
    /// # Errors
    ///
    /// `SessionError::InvalidMaxAge` if the configured lifetime is out of
    /// range; `SessionError::Random` if the OS random source fails (not
    /// retryable); store errors from `create` are propagated.
    pub async fn create_session(&self, req: &HttpRequest) -> Result<Session, SessionError> {
        let max_age = self.session_lifetime()?;
        let token = generate_token().map_err(SessionError::Random)?;
        let mut session = Session::new(Uuid::new_v4().to_string(), token, max_age);

        let (client_ip, user_agent_info) = extract_client_info(req);
        session.ip = client_ip;
        session.device = user_agent_info.device_summary();
        session.user_agent = user_agent_info.user_agent;
        session.fingerprint = compute_fingerprint(self.config.fingerprint_mode, req);

        self.store.create(&session).await?;
        session.clear_new();
        session.clear_dirty();

        log::debug!(
            "Created session {} (device: {})",
            session.id(),
            session.device.as_deref().unwrap_or("unknown")
        );
        Ok(session)
    }

    /// Replace the session token and persist the change, all or nothing
    ///
    /// After success the previous token no longer resolves in the store. On
    /// store failure the in-memory token and dirty flag are restored before
    /// the error is returned.
    ///
    /// # Errors
    ///
    /// `SessionError::Random` or the store's `update` error
    pub async fn rotate_token(&self, session: &mut Session) -> Result<(), SessionError> {
        let token = generate_token().map_err(SessionError::Random)?;

        let was_dirty = session.is_dirty();
        let previous = session.replace_token(token);

        if let Err(e) = self.store.update(session).await {
            log::error!(
                "Token rotation failed for session {}, keeping previous token: {e}",
                session.id()
            );
            session.restore_token(previous, was_dirty);
            return Err(e.into());
        }

        session.clear_dirty();
        log::debug!("Rotated token for session {}", session.id());
        Ok(())
    }

    /// Bind `user_id` to the session and rotate its token
    ///
    /// Call this right after login, before trusting the session. On failure
    /// the session is left exactly as it was, user id included.
    ///
    /// # Errors
    ///
    /// Any error from [`Self::rotate_token`]
    pub async fn authenticate_session(
        &self,
        session: &mut Session,
        user_id: &str,
    ) -> Result<(), SessionError> {
        let snapshot = session.clone();

        session.set_user_id(user_id);
        if let Err(e) = self.rotate_token(session).await {
            *session = snapshot;
            return Err(e);
        }

        log::info!("Session {} authenticated for user {user_id}", session.id());
        Ok(())
    }

    /// Write pending changes to the store, then clear the dirty flag
    ///
    /// A clean session is left untouched. A session that was never stored is
    /// created instead of updated.
    ///
    /// # Errors
    ///
    /// Store `create` / `update` errors; the session stays dirty
    pub async fn persist_session(&self, session: &mut Session) -> Result<(), SessionError> {
        if !session.is_dirty() {
            return Ok(());
        }

        if session.is_new() {
            self.store.create(session).await?;
            session.clear_new();
        } else {
            self.store.update(session).await?;
        }

        session.clear_dirty();
        Ok(())
    }

    /// Record activity now, in memory and in the store
    ///
    /// # Errors
    ///
    /// The store's `touch` error
    pub async fn touch_session(&self, session: &mut Session) -> Result<(), SessionError> {
        let now = Utc::now();
        self.store.touch(session.id(), now).await?;
        session.last_active_at = now;
        Ok(())
    }

    /// Log out: delete the session record and clear the cookie
    ///
    /// The clearing cookie is written even when the store delete fails.
    ///
    /// # Errors
    ///
    /// The store's `delete` error
    pub async fn destroy_session(
        &self,
        res: &mut HttpResponseBuilder,
        session: &Session,
    ) -> Result<(), SessionError> {
        self.delete_session(res);
        self.store.delete(session.id()).await?;
        log::debug!("Destroyed session {}", session.id());
        Ok(())
    }

    /// Log a user out of every device
    ///
    /// # Errors
    ///
    /// The store's `delete_by_user_id` error
    pub async fn revoke_user_sessions(&self, user_id: &str) -> Result<(), SessionError> {
        self.store.delete_by_user_id(user_id).await?;
        log::info!("Revoked all sessions for user {user_id}");
        Ok(())
    }
}

// =============================================================================
// 4. Cookies
// =============================================================================

impl SessionManager {
    fn build_cookie(&self, value: String, max_age_seconds: i64) -> Cookie<'static> {
        let mut builder = Cookie::build(self.config.cookie_name.clone(), value)
            .path(self.config.path.clone())
            .secure(self.config.secure)
            .http_only(self.config.http_only)
            .same_site(self.config.same_site.into())
            .max_age(CookieDuration::seconds(max_age_seconds));

        if let Some(domain) = &self.config.domain {
            builder = builder.domain(domain.clone());
        }

        builder.finish()
    }

    /// Session cookie carrying the raw token
    #[must_use]
    pub fn session_cookie(&self, session: &Session) -> Cookie<'static> {
        self.build_cookie(session.token().to_string(), self.config.max_age_seconds)
    }

    /// Cookie that removes the session cookie from the browser
    #[must_use]
    pub fn expired_session_cookie(&self) -> Cookie<'static> {
        self.build_cookie(String::new(), -1)
    }

    /// Attach the session cookie to the response
    pub fn save_session(&self, res: &mut HttpResponseBuilder, session: &Session) {
        append_cookie(res, &self.session_cookie(session));
    }

    /// Clear the session cookie; does not touch the store
    pub fn delete_session(&self, res: &mut HttpResponseBuilder) {
        append_cookie(res, &self.expired_session_cookie());
    }
}

// =============================================================================
// 5. Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{response_cookies, RequestBuilder, TestFixtures};
    use actix_web::cookie::SameSite;
    use actix_web::HttpResponse;

    fn request_for(manager: &SessionManager, session: &Session) -> HttpRequest {
        RequestBuilder::new()
            .browser_headers()
            .with_cookie(manager.session_cookie(session))
            .build()
    }

    #[actix_web::test]
    async fn test_load_without_cookie() {
        let (manager, _) = TestFixtures::session_manager_with(SessionConfig::default());

        let req = RequestBuilder::browser("/");
        assert!(manager.load_session(&req).await.unwrap().is_none());

        let req = RequestBuilder::new()
            .with_session_cookie(DEFAULT_SESSION_COOKIE_NAME, "")
            .build();
        assert!(manager.load_session(&req).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_create_session_populates_context() {
        let (manager, store) = TestFixtures::session_manager_with(SessionConfig {
            fingerprint_mode: FingerprintMode::CookieDefault,
            ..SessionConfig::default()
        });
        let req = RequestBuilder::new()
            .browser_headers()
            .with_client_ip("203.0.113.7")
            .build();

        let session = manager.create_session(&req).await.unwrap();

        assert!(!session.is_new());
        assert!(!session.is_dirty());
        assert!(!session.is_authenticated());
        assert_eq!(session.token().len(), 43);
        assert!(Uuid::parse_str(session.id()).is_ok());
        assert_eq!(session.ip.as_deref(), Some("203.0.113.7"));
        assert!(session.user_agent.is_some());
        assert!(session.device.is_some());
        assert_eq!(session.fingerprint.as_ref().map(String::len), Some(64));

        let lifetime = session.expires_at - session.created_at;
        assert_eq!(lifetime.num_seconds(), DEFAULT_SESSION_MAX_AGE_SECONDS);
        assert_eq!(store.len(), 1);
    }

    #[actix_web::test]
    async fn test_create_session_store_failure() {
        let (manager, store) = TestFixtures::session_manager_with(SessionConfig::default());
        store.set_failing(true);

        let result = manager.create_session(&RequestBuilder::browser("/")).await;
        assert!(matches!(
            result,
            Err(SessionError::Store(StoreError::Backend(_)))
        ));
    }

    #[actix_web::test]
    async fn test_create_session_rejects_out_of_range_max_age() {
        for max_age_seconds in [i64::MAX, i64::MIN, 0, -60] {
            let (manager, store) = TestFixtures::session_manager_with(SessionConfig {
                max_age_seconds,
                ..SessionConfig::default()
            });

            let err = manager
                .create_session(&RequestBuilder::browser("/"))
                .await
                .unwrap_err();
            assert!(matches!(err, SessionError::InvalidMaxAge(s) if s == max_age_seconds));
            assert!(!err.is_absent());
            assert!(store.is_empty());
        }
    }

    #[actix_web::test]
    async fn test_load_round_trip_is_clean() {
        let (manager, _) = TestFixtures::session_manager_with(SessionConfig::default());
        let mut session = manager
            .create_session(&RequestBuilder::browser("/"))
            .await
            .unwrap();
        session.set_value("theme", "dark");
        manager.persist_session(&mut session).await.unwrap();

        let loaded = manager
            .load_session(&request_for(&manager, &session))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(loaded.id(), session.id());
        assert_eq!(loaded.get_value_as::<String>("theme").unwrap(), "dark");
        assert!(!loaded.is_new());
        assert!(!loaded.is_dirty());
    }

    #[actix_web::test]
    async fn test_load_unknown_token() {
        let (manager, _) = TestFixtures::session_manager_with(SessionConfig::default());
        let req = RequestBuilder::new()
            .with_session_cookie(DEFAULT_SESSION_COOKIE_NAME, "no-such-token")
            .build();

        let err = manager.load_session(&req).await.unwrap_err();
        assert!(matches!(err, SessionError::Store(StoreError::NotFound)));
        assert!(manager.current_session(&req).await.is_none());
    }

    #[actix_web::test]
    async fn test_load_expired_session() {
        let (manager, store) = TestFixtures::session_manager_with(SessionConfig::default());
        let session = TestFixtures::expired_session();
        store.insert(&session);

        let req = request_for(&manager, &session);
        let err = manager.load_session(&req).await.unwrap_err();
        assert!(matches!(err, SessionError::Store(StoreError::Expired)));
        assert!(err.is_absent());
    }

    #[actix_web::test]
    async fn test_current_session_swallows_backend_errors() {
        let (manager, store) = TestFixtures::session_manager_with(SessionConfig::default());
        let session = manager
            .create_session(&RequestBuilder::browser("/"))
            .await
            .unwrap();
        let req = request_for(&manager, &session);

        assert!(manager.current_session(&req).await.is_some());

        store.set_failing(true);
        assert!(manager.load_session(&req).await.is_err());
        assert!(manager.current_session(&req).await.is_none());
    }

    #[actix_web::test]
    async fn test_fingerprint_reject_and_warn() {
        let chrome = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) Chrome/120.0";
        let firefox = "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Firefox/121.0";

        for (strictness, accepted) in [
            (FingerprintStrictness::Reject, false),
            (FingerprintStrictness::Warn, true),
        ] {
            let (manager, _) = TestFixtures::session_manager_with(SessionConfig {
                fingerprint_mode: FingerprintMode::UserAgentOnly,
                fingerprint_strictness: strictness,
                ..SessionConfig::default()
            });
            let session = manager
                .create_session(&RequestBuilder::new().user_agent(chrome).build())
                .await
                .unwrap();
            let cookie = manager.session_cookie(&session);

            let same_device = RequestBuilder::new()
                .user_agent(chrome)
                .with_cookie(cookie.clone())
                .build();
            assert!(manager.load_session(&same_device).await.unwrap().is_some());

            let other_device = RequestBuilder::new()
                .user_agent(firefox)
                .with_cookie(cookie)
                .build();
            let result = manager.load_session(&other_device).await;
            if accepted {
                assert_eq!(result.unwrap().unwrap().id(), session.id());
            } else {
                assert!(matches!(result, Err(SessionError::FingerprintMismatch)));
            }
        }
    }

    #[actix_web::test]
    async fn test_rotate_token_invalidates_previous() {
        let (manager, store) = TestFixtures::session_manager_with(SessionConfig::default());
        let mut session = manager
            .create_session(&RequestBuilder::browser("/"))
            .await
            .unwrap();
        let old_token = session.token().to_string();
        let id = session.id().to_string();

        manager.rotate_token(&mut session).await.unwrap();

        assert_ne!(session.token(), old_token);
        assert_eq!(session.id(), id);
        assert!(!session.is_dirty());
        assert!(matches!(
            store.get(&old_token).await,
            Err(StoreError::NotFound)
        ));
        assert_eq!(store.get(session.token()).await.unwrap().id(), id);
    }

    #[actix_web::test]
    async fn test_rotate_token_rolls_back_on_store_failure() {
        let (manager, store) = TestFixtures::session_manager_with(SessionConfig::default());
        let mut session = manager
            .create_session(&RequestBuilder::browser("/"))
            .await
            .unwrap();
        session.set_value("cart", 2);
        let old_token = session.token().to_string();

        store.set_failing(true);
        let result = manager.rotate_token(&mut session).await;

        assert!(result.is_err());
        assert_eq!(session.token(), old_token);
        assert!(session.is_dirty());

        store.set_failing(false);
        assert!(store.get(&old_token).await.is_ok());
    }

    #[actix_web::test]
    async fn test_authenticate_session_rolls_back_user() {
        let (manager, store) = TestFixtures::session_manager_with(SessionConfig::default());
        let mut session = manager
            .create_session(&RequestBuilder::browser("/"))
            .await
            .unwrap();
        let old_token = session.token().to_string();

        store.set_failing(true);
        assert!(manager
            .authenticate_session(&mut session, "user-42")
            .await
            .is_err());
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), old_token);
        assert!(!session.is_dirty());

        store.set_failing(false);
        manager
            .authenticate_session(&mut session, "user-42")
            .await
            .unwrap();
        assert!(session.is_authenticated());
        assert_ne!(session.token(), old_token);
        assert_eq!(
            store.get(session.token()).await.unwrap().user_id(),
            Some("user-42")
        );
    }

    #[actix_web::test]
    async fn test_persist_session() {
        let (manager, store) = TestFixtures::session_manager_with(SessionConfig::default());
        let mut session = manager
            .create_session(&RequestBuilder::browser("/"))
            .await
            .unwrap();

        // Clean sessions never reach the store
        store.set_failing(true);
        manager.persist_session(&mut session).await.unwrap();

        session.set_value("step", 3);
        assert!(manager.persist_session(&mut session).await.is_err());
        assert!(session.is_dirty());

        store.set_failing(false);
        manager.persist_session(&mut session).await.unwrap();
        assert!(!session.is_dirty());
        assert_eq!(
            store
                .get(session.token())
                .await
                .unwrap()
                .get_value_or("step", 0),
            3
        );
    }

    #[actix_web::test]
    async fn test_persist_unsaved_session_creates_it() {
        let (manager, store) = TestFixtures::session_manager_with(SessionConfig::default());
        let mut session = TestFixtures::session();
        assert!(session.is_new());

        manager.persist_session(&mut session).await.unwrap();
        assert!(!session.is_new());
        assert!(!session.is_dirty());
        assert_eq!(store.len(), 1);
    }

    #[actix_web::test]
    async fn test_touch_session() {
        let (manager, store) = TestFixtures::session_manager_with(SessionConfig::default());
        let mut session = manager
            .create_session(&RequestBuilder::browser("/"))
            .await
            .unwrap();
        let before = session.last_active_at;

        manager.touch_session(&mut session).await.unwrap();
        assert!(session.last_active_at >= before);
        assert_eq!(
            store.get(session.token()).await.unwrap().last_active_at,
            session.last_active_at
        );
    }

    #[actix_web::test]
    async fn test_destroy_and_revoke() {
        let (manager, store) = TestFixtures::session_manager_with(SessionConfig::default());
        let req = RequestBuilder::browser("/");

        let mut first = manager.create_session(&req).await.unwrap();
        let mut second = manager.create_session(&req).await.unwrap();
        let third = manager.create_session(&req).await.unwrap();
        manager.authenticate_session(&mut first, "user-1").await.unwrap();
        manager.authenticate_session(&mut second, "user-1").await.unwrap();
        assert_eq!(store.len(), 3);

        let mut res = HttpResponse::Ok();
        manager.destroy_session(&mut res, &third).await.unwrap();
        assert_eq!(store.len(), 2);
        let cookies = response_cookies(&mut res);
        assert_eq!(cookies[0].value(), "");
        assert_eq!(cookies[0].max_age(), Some(CookieDuration::ZERO));
        assert_eq!(
            manager.expired_session_cookie().max_age(),
            Some(CookieDuration::seconds(-1))
        );

        manager.revoke_user_sessions("user-1").await.unwrap();
        assert_eq!(store.len(), 0);
    }

    #[actix_web::test]
    async fn test_session_cookie_attributes() {
        let (manager, _) = TestFixtures::session_manager_with(SessionConfig {
            cookie_name: "app_session".to_string(),
            max_age_seconds: 3600,
            domain: Some("example.com".to_string()),
            same_site: SameSitePolicy::Strict,
            ..SessionConfig::default()
        });
        let session = manager
            .create_session(&RequestBuilder::browser("/"))
            .await
            .unwrap();

        let mut res = HttpResponse::Ok();
        manager.save_session(&mut res, &session);
        let cookie = &response_cookies(&mut res)[0];

        assert_eq!(cookie.name(), "app_session");
        assert_eq!(cookie.value(), session.token());
        assert_eq!(cookie.domain(), Some("example.com"));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(CookieDuration::seconds(3600)));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
    }

    #[actix_web::test]
    async fn test_delete_session_cookie_is_idempotent() {
        let (manager, _) = TestFixtures::session_manager_with(SessionConfig::default());

        for _ in 0..2 {
            let mut res = HttpResponse::Ok();
            manager.delete_session(&mut res);
            let cookies = response_cookies(&mut res);
            assert_eq!(cookies.len(), 1);
            assert_eq!(cookies[0].name(), DEFAULT_SESSION_COOKIE_NAME);
            assert_eq!(cookies[0].value(), "");

            let req = RequestBuilder::new().with_cookie(cookies[0].clone()).build();
            assert!(manager.load_session(&req).await.unwrap().is_none());
        }
    }
}
