//! HTTP request builders for testing
//!
//! Fluent builders for requests with common browser, mobile and client-hint
//! header sets, plus cookies.

use actix_web::cookie::Cookie;
use actix_web::http::Method;
use actix_web::{test, HttpRequest};

use super::constants::TEST_USER_AGENT;

/// Builder for creating HTTP requests for testing
pub struct RequestBuilder {
    method: Method,
    uri: String,
    headers: Vec<(String, String)>,
    cookies: Vec<Cookie<'static>>,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    /// Create a new request builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            method: Method::GET,
            uri: "/".to_string(),
            headers: Vec::new(),
            cookies: Vec::new(),
        }
    }

    /// Set the HTTP method
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set the request URI
    #[must_use]
    pub fn uri(mut self, uri: &str) -> Self {
        self.uri = uri.to_string();
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(self, user_agent: &str) -> Self {
        self.header("User-Agent", user_agent)
    }

    /// Set common browser headers
    #[must_use]
    pub fn browser_headers(self) -> Self {
        self.user_agent(TEST_USER_AGENT)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.5")
            .header("Accept-Encoding", "gzip, deflate")
    }

    /// Set common mobile headers
    #[must_use]
    pub fn mobile_headers(self) -> Self {
        self.user_agent(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1",
        )
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .header("Accept-Language", "en-US,en;q=0.5")
    }

    /// Add a cookie to the request
    #[must_use]
    pub fn with_cookie(mut self, cookie: Cookie<'static>) -> Self {
        self.cookies.push(cookie);
        self
    }

    /// Add a session cookie carrying `token`
    #[must_use]
    pub fn with_session_cookie(self, name: &str, token: &str) -> Self {
        self.with_cookie(Cookie::new(name.to_string(), token.to_string()))
    }

    /// Set client IP for testing purposes
    ///
    /// Adds the forwarding header actix reads for the real client address.
    #[must_use]
    pub fn with_client_ip(self, ip: &str) -> Self {
        self.header("X-Forwarded-For", ip)
    }

    /// Build the final `HttpRequest`
    #[must_use]
    pub fn build(self) -> HttpRequest {
        let mut req = test::TestRequest::default()
            .method(self.method)
            .uri(&self.uri);

        for (name, value) in self.headers {
            req = req.insert_header((name, value));
        }

        for cookie in self.cookies {
            req = req.cookie(cookie);
        }

        req.to_http_request()
    }
}

/// Quick builder functions for common request types
impl RequestBuilder {
    /// Create a browser-like GET request
    #[must_use]
    pub fn browser(uri: &str) -> HttpRequest {
        Self::new()
            .method(Method::GET)
            .uri(uri)
            .browser_headers()
            .build()
    }

    /// Create a mobile GET request
    #[must_use]
    pub fn mobile(uri: &str) -> HttpRequest {
        Self::new()
            .method(Method::GET)
            .uri(uri)
            .mobile_headers()
            .build()
    }

    /// Create an empty request with no headers
    #[must_use]
    pub fn empty_request() -> HttpRequest {
        Self::new().build()
    }

    /// Create a Windows Chrome request with client hints headers
    #[must_use]
    pub fn client_hints_request() -> HttpRequest {
        Self::new()
            .user_agent(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36",
            )
            .header(
                "sec-ch-ua",
                "\"Google Chrome\";v=\"120\", \"Chromium\";v=\"120\"",
            )
            .header("sec-ch-ua-platform", "\"Windows\"")
            .header("sec-ch-ua-mobile", "?0")
            .build()
    }
}
