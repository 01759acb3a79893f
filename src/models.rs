//! Session entity
//!
//! A [`Session`] is a plain value object: it never performs I/O. Persistence
//! goes through [`crate::session::SessionStore`] and the lifecycle is driven by
//! [`crate::session::SessionManager`].

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Typed value retrieval failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueError {
    #[error("session value not found: {0}")]
    NotFound(String),

    #[error("session value '{key}' is not a {expected}")]
    TypeMismatch { key: String, expected: &'static str },
}

/// One authenticated or anonymous session
///
/// `id` is the durable identity used as the store key and for revocation; it is
/// never sent to the client. `token` is the bearer value carried in the session
/// cookie and changes on every rotation.
///
/// The `is_new` and `dirty` flags are transient and never serialized. They are
/// plain fields: a session shared between concurrent requests must be
/// serialized by the caller.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Session {
    id: String,
    token: String,
    user_id: Option<String>,
    #[serde(default)]
    values: HashMap<String, Value>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub device: Option<String>,
    pub fingerprint: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(skip)]
    is_new: bool,
    #[serde(skip)]
    dirty: bool,
}

impl Session {
    /// Create a fresh, unsaved session expiring `max_age` from now
    ///
    /// An expiry past the representable range saturates at the latest
    /// representable instant.
    #[must_use]
    pub fn new(id: String, token: String, max_age: Duration) -> Self {
        let now = Utc::now();
        Self {
            id,
            token,
            user_id: None,
            values: HashMap::new(),
            ip: None,
            user_agent: None,
            device: None,
            fingerprint: None,
            created_at: now,
            last_active_at: now,
            expires_at: now.checked_add_signed(max_age).unwrap_or(DateTime::<Utc>::MAX_UTC),
            is_new: true,
            dirty: true,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    #[must_use]
    pub const fn values(&self) -> &HashMap<String, Value> {
        &self.values
    }

    /// Assign the owning user and mark the session dirty
    ///
    /// Callers establishing a new identity should go through
    /// `SessionManager::authenticate_session` so the token is rotated as well.
    pub fn set_user_id(&mut self, user_id: impl Into<String>) {
        self.user_id = Some(user_id.into());
        self.dirty = true;
    }

    /// Drop the owning user, turning the session anonymous
    pub fn clear_user_id(&mut self) {
        if self.user_id.take().is_some() {
            self.dirty = true;
        }
    }

    /// `true` only when a non-empty user id is present
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// Wall-clock expiry check, evaluated on every call
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
        self.dirty = true;
    }

    #[must_use]
    pub fn get_value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Remove a value, marking the session dirty only if the key existed
    pub fn delete_value(&mut self, key: &str) -> Option<Value> {
        let removed = self.values.remove(key);
        if removed.is_some() {
            self.dirty = true;
        }
        removed
    }

    /// Retrieve a value converted to `T`
    ///
    /// # Errors
    ///
    /// Returns `ValueError::NotFound` for a missing key and
    /// `ValueError::TypeMismatch` when the stored value does not convert to `T`.
    pub fn get_value_as<T: DeserializeOwned>(&self, key: &str) -> Result<T, ValueError> {
        let value = self
            .values
            .get(key)
            .ok_or_else(|| ValueError::NotFound(key.to_string()))?;

        T::deserialize(value).map_err(|_| ValueError::TypeMismatch {
            key: key.to_string(),
            expected: std::any::type_name::<T>(),
        })
    }

    /// Retrieve a value converted to `T`, or `default` when missing or mistyped
    #[must_use]
    pub fn get_value_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get_value_as(key).unwrap_or(default)
    }

    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn clear_new(&mut self) {
        self.is_new = false;
    }

    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Clear the dirty flag; only call after a confirmed store write
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Swap in a freshly generated token, returning the previous one
    pub(crate) fn replace_token(&mut self, token: String) -> String {
        self.dirty = true;
        std::mem::replace(&mut self.token, token)
    }

    /// Undo [`Session::replace_token`] after a failed store write
    pub(crate) fn restore_token(&mut self, token: String, was_dirty: bool) {
        self.token = token;
        self.dirty = was_dirty;
    }
}
