//! Session persistence contract
//!
//! The session manager never embeds storage logic. Backends (SQL, key-value,
//! the in-memory store used by tests) implement [`SessionStore`] and are handed
//! to [`crate::session::SessionManager::new`] behind an `Arc`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::Session;

/// Store outcomes other than success
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record matches the token or id
    #[error("Session not found")]
    NotFound,

    /// A record exists but its `expires_at` has passed
    #[error("Session expired")]
    Expired,

    /// Backend failure (connection, serialization, constraint, ...)
    #[error("Session store failure: {0}")]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    /// `true` for conditions that mean "no usable session" rather than a fault
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::NotFound | Self::Expired)
    }
}

/// Storage backend for sessions
///
/// Sessions returned by [`SessionStore::get`] must come back clean: `is_new`
/// and `dirty` both false. Implementations decide their own concurrency model;
/// the manager never assumes single-writer access to a session id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a new session record
    async fn create(&self, session: &Session) -> Result<(), StoreError>;

    /// Look up a session by its bearer token
    async fn get(&self, token: &str) -> Result<Session, StoreError>;

    /// Overwrite the record keyed by `session.id()`, including its token
    async fn update(&self, session: &Session) -> Result<(), StoreError>;

    /// Remove a single session by id
    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Remove every session owned by `user_id`
    async fn delete_by_user_id(&self, user_id: &str) -> Result<(), StoreError>;

    /// Record activity without rewriting the whole session
    async fn touch(&self, id: &str, last_active_at: DateTime<Utc>) -> Result<(), StoreError>;
}
