//! Session Management Module
//!
//! Session lifecycle, cookie encoding and hijack detection.
//!
//! # Modules
//!
//! - [`manager`] - Session lifecycle against a [`SessionStore`]
//! - [`store`] - Storage backend contract
//! - [`cookie`] - Plain, signed, encrypted and flash cookies
//! - [`fingerprint`] - Device fingerprinting for hijack detection
//! - [`errors`] - Session and cookie error types
//! - [`utils`] - Request context helpers

pub mod cookie;
pub mod errors;
pub mod fingerprint;
pub mod manager;
pub mod store;
pub mod utils;

// Re-export commonly used items for convenience
pub use cookie::{CookieConfig, CookieManager, SameSitePolicy, FLASH_COOKIE_PREFIX};
pub use errors::{CookieError, SessionError};
pub use fingerprint::{FingerprintMode, FingerprintStrictness};
pub use manager::{
    SessionConfig, SessionManager, DEFAULT_SESSION_COOKIE_NAME, DEFAULT_SESSION_MAX_AGE_SECONDS,
};
pub use store::{SessionStore, StoreError};
pub use utils::extract_client_info;
