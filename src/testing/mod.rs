//! Unified testing utilities for sessionvault
//!
//! Available to unit tests and, with the `testing` feature, to integration
//! tests and downstream crates.
//!
//! ## Organization
//!
//! - [`fixtures`] - Pre-built sessions and managers
//! - [`requests`] - HTTP request builders
//! - [`mock`] - In-memory [`crate::session::SessionStore`] with failure injection
//!
//! ## Usage
//!
//! ```rust
//! use sessionvault::testing::{response_cookies, RequestBuilder, TestFixtures};
//!
//! # actix_web::rt::System::new().block_on(async {
//! let (manager, _store) = TestFixtures::session_manager();
//! let session = manager
//!     .create_session(&RequestBuilder::browser("/"))
//!     .await
//!     .unwrap();
//!
//! let mut res = actix_web::HttpResponse::Ok();
//! manager.save_session(&mut res, &session);
//! assert_eq!(response_cookies(&mut res)[0].value(), session.token());
//! # });
//! ```

pub mod fixtures;
pub mod mock;
pub mod requests;

use actix_web::cookie::Cookie;
use actix_web::{HttpRequest, HttpResponseBuilder};

pub use fixtures::TestFixtures;
pub use mock::MemoryStore;
pub use requests::RequestBuilder;

/// Common test constants
pub mod constants {
    /// Default test client IP
    pub const TEST_CLIENT_IP: &str = "192.168.1.1";

    /// Default test user agent string
    pub const TEST_USER_AGENT: &str =
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

    /// Default authenticated user
    pub const TEST_USER_ID: &str = "user-42";

    /// Cookie secret long enough for signing and encryption (40 bytes)
    pub const TEST_COOKIE_SECRET: &str = "test_cookie_secret_key_40_bytes_long_abc";
}

/// Finish a response and return the cookies it sets
///
/// Cookies come back parsed from the `Set-Cookie` headers, the way a browser
/// would see them.
#[must_use]
pub fn response_cookies(res: &mut HttpResponseBuilder) -> Vec<Cookie<'static>> {
    res.finish().cookies().map(Cookie::into_owned).collect()
}

/// Build a plain request carrying `cookies`, as a browser sends them back
#[must_use]
pub fn request_with_cookies(cookies: Vec<Cookie<'static>>) -> HttpRequest {
    cookies
        .into_iter()
        .fold(RequestBuilder::new(), RequestBuilder::with_cookie)
        .build()
}
