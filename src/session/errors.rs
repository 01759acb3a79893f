//! Error types for session loading and cookie encoding

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::session::store::StoreError;

/// Session manager failures
#[derive(Debug, Error)]
pub enum SessionError {
    /// Propagated verbatim from the store, including `NotFound` and `Expired`
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Stored fingerprint differs from the current request under `Reject`
    #[error("Session fingerprint mismatch")]
    FingerprintMismatch,

    /// The OS random source failed while generating a token
    #[error("Secure random source unavailable: {0}")]
    Random(#[source] anyhow::Error),

    /// Configured lifetime is not positive or does not fit a timestamp
    #[error("Invalid session max age: {0} seconds")]
    InvalidMaxAge(i64),
}

impl SessionError {
    /// `true` when the caller should treat the request as having no session
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        match self {
            Self::Store(e) => e.is_absent(),
            Self::FingerprintMismatch => true,
            Self::Random(_) | Self::InvalidMaxAge(_) => false,
        }
    }
}

impl ResponseError for SessionError {
    fn status_code(&self) -> StatusCode {
        if self.is_absent() {
            StatusCode::UNAUTHORIZED
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Never echo the cause: fingerprint and store details stay server-side
        HttpResponse::build(self.status_code()).finish()
    }
}

/// Cookie manager failures
#[derive(Debug, Error)]
pub enum CookieError {
    /// Cookie absent from the request, or present with an empty value
    #[error("Cookie not found")]
    NotFound,

    /// No secret configured, or the secret is shorter than 32 bytes
    #[error("A cookie secret of at least 32 bytes is required")]
    SecretRequired,

    /// Signed cookie is malformed or its HMAC does not match
    #[error("Cookie signature is invalid")]
    BadSignature,

    /// Encrypted cookie could not be decrypted; tamper and corruption are not distinguished
    #[error("Cookie decryption failed")]
    DecryptionFailed,

    /// Flash payload could not be encoded or decoded as JSON
    #[error("Cookie payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Encryption could not run (random source or cipher failure)
    #[error("Cookie encryption failed: {0}")]
    Encryption(#[source] anyhow::Error),
}
