#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![deny(warnings)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the sessionvault crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod models;
pub mod session;
pub mod settings;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use models::{Session, ValueError};
pub use session::{
    CookieConfig, CookieError, CookieManager, FingerprintMode, FingerprintStrictness,
    SessionConfig, SessionError, SessionManager, SessionStore, StoreError,
};
pub use settings::SessionVaultSettings;
