//! Device fingerprinting for session hijack detection
//!
//! A fingerprint is an opaque SHA-256 hex digest of selected request
//! attributes. It is computed when a session is created, stored with it, and
//! recomputed on every load. Comparison is exact-match; what a mismatch means
//! is decided by [`FingerprintStrictness`].

use std::fmt;
use std::str::FromStr;

use actix_web::HttpRequest;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::session::utils::extract_client_info;

/// Which request attributes feed the fingerprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerprintMode {
    /// No fingerprint is computed or checked
    #[default]
    Disabled,
    /// User-Agent, Accept-Language and Accept-Encoding
    CookieDefault,
    /// Derived platform and mobile flag only; tolerant of browser updates
    MinimalJwt,
    /// User-Agent only
    UserAgentOnly,
    /// `CookieDefault` plus the client IP; breaks on network changes
    StrictWithIp,
}

/// What to do when a stored fingerprint does not match the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerprintStrictness {
    /// Log the anomaly and keep the session
    #[default]
    Warn,
    /// Fail the load with `SessionError::FingerprintMismatch`
    Reject,
}

impl FromStr for FingerprintMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "disabled" | "none" | "off" => Ok(Self::Disabled),
            "cookie_default" | "cookie" => Ok(Self::CookieDefault),
            "minimal_jwt" | "jwt" => Ok(Self::MinimalJwt),
            "user_agent_only" | "htmx" => Ok(Self::UserAgentOnly),
            "strict_with_ip" | "strict" => Ok(Self::StrictWithIp),
            other => Err(format!("unknown fingerprint mode: {other}")),
        }
    }
}

impl FromStr for FingerprintStrictness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "warn" => Ok(Self::Warn),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown fingerprint strictness: {other}")),
        }
    }
}

impl fmt::Display for FingerprintMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disabled => "disabled",
            Self::CookieDefault => "cookie_default",
            Self::MinimalJwt => "minimal_jwt",
            Self::UserAgentOnly => "user_agent_only",
            Self::StrictWithIp => "strict_with_ip",
        };
        f.write_str(name)
    }
}

/// Hash context values into an opaque fingerprint
///
/// Missing values hash as empty strings; the `|` separator keeps
/// `("ab", "")` and `("a", "b")` apart.
#[must_use]
pub fn hash_context(parts: &[Option<&str>]) -> String {
    let mut hasher = Sha256::new();

    for (index, part) in parts.iter().enumerate() {
        if index > 0 {
            hasher.update(b"|");
        }
        if let Some(value) = part {
            hasher.update(value.as_bytes());
        }
    }

    format!("{:x}", hasher.finalize())
}

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|h| h.to_str().ok())
}

/// Compute the fingerprint for `req` under `mode`
///
/// Returns `None` for [`FingerprintMode::Disabled`].
#[must_use]
pub fn compute_fingerprint(mode: FingerprintMode, req: &HttpRequest) -> Option<String> {
    let user_agent = header(req, "user-agent");
    let accept_language = header(req, "accept-language");
    let accept_encoding = header(req, "accept-encoding");

    let fingerprint = match mode {
        FingerprintMode::Disabled => return None,
        FingerprintMode::CookieDefault => {
            hash_context(&[user_agent, accept_language, accept_encoding])
        }
        FingerprintMode::MinimalJwt => {
            let (_, info) = extract_client_info(req);
            let mobile = info.mobile.to_string();
            hash_context(&[info.platform.as_deref(), Some(&mobile)])
        }
        FingerprintMode::UserAgentOnly => hash_context(&[user_agent]),
        FingerprintMode::StrictWithIp => {
            let (client_ip, _) = extract_client_info(req);
            hash_context(&[
                user_agent,
                accept_language,
                accept_encoding,
                client_ip.as_deref(),
            ])
        }
    };

    Some(fingerprint)
}

/// Compare a stored fingerprint with the one computed for `req`
///
/// Sessions without a stored fingerprint, and the disabled mode, always match.
#[must_use]
pub fn fingerprint_matches(mode: FingerprintMode, stored: Option<&str>, req: &HttpRequest) -> bool {
    let Some(stored) = stored else {
        return true;
    };
    compute_fingerprint(mode, req).is_none_or(|current| current == stored)
}
