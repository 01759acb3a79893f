//! Cookie manager: plain, signed, encrypted and flash cookies
//!
//! Wire formats:
//! - plain: the raw value
//! - signed: `base64url(value) "." base64url(HMAC-SHA256(secret, value))`
//! - encrypted: `base64url(nonce || AES-256-GCM(ciphertext + tag))`
//! - flash: cookie `flash_<key>`, encrypted JSON, no `Max-Age`, cleared on read
//!
//! The manager knows nothing about sessions; the session token cookie is
//! written by [`crate::session::SessionManager`] directly.

use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponseBuilder};
use base64::{engine::general_purpose, Engine as _};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::session::errors::CookieError;
use crate::utils::crypto::{
    decrypt_bytes, derive_encryption_key, encrypt_bytes, sign_hmac_sha256, verify_hmac_sha256,
    ENCRYPTION_KEY_SIZE, MIN_SECRET_LENGTH,
};

/// Prefix prepended to caller keys to name flash cookies
pub const FLASH_COOKIE_PREFIX: &str = "flash_";

const SIGNATURE_SEPARATOR: char = '.';

/// Append `cookie` as a percent-encoded `Set-Cookie` header
///
/// Request cookies are parsed with `parse_encoded`, so values must be written
/// encoded to survive `;`, spaces and non-ASCII text.
pub(crate) fn append_cookie(res: &mut HttpResponseBuilder, cookie: &Cookie<'_>) {
    res.append_header((header::SET_COOKIE, cookie.encoded().to_string()));
}

/// `SameSite` attribute in a serializable form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SameSitePolicy {
    Strict,
    #[default]
    Lax,
    None,
}

impl From<SameSitePolicy> for SameSite {
    fn from(policy: SameSitePolicy) -> Self {
        match policy {
            SameSitePolicy::Strict => Self::Strict,
            SameSitePolicy::Lax => Self::Lax,
            SameSitePolicy::None => Self::None,
        }
    }
}

impl std::str::FromStr for SameSitePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lax" => Ok(Self::Lax),
            "none" => Ok(Self::None),
            other => Err(format!("unknown SameSite policy: {other}")),
        }
    }
}

/// Construction-time configuration for [`CookieManager`]
#[derive(Clone)]
pub struct CookieConfig {
    /// Shared secret for signing and encryption; shorter than 32 bytes counts as absent
    pub secret: Option<String>,
    pub path: String,
    pub domain: Option<String>,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSitePolicy,
    /// `Max-Age` for plain, signed and encrypted cookies; `None` means browser-session
    pub max_age_seconds: Option<i64>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            secret: None,
            path: "/".to_string(),
            domain: None,
            secure: true,
            http_only: true,
            same_site: SameSitePolicy::Lax,
            max_age_seconds: None,
        }
    }
}

impl std::fmt::Debug for CookieConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("path", &self.path)
            .field("domain", &self.domain)
            .field("secure", &self.secure)
            .field("http_only", &self.http_only)
            .field("same_site", &self.same_site)
            .field("max_age_seconds", &self.max_age_seconds)
            .finish()
    }
}

/// Key material derived once from a valid secret
#[derive(Clone)]
struct CookieKeys {
    signing_key: Vec<u8>,
    encryption_key: [u8; ENCRYPTION_KEY_SIZE],
}

/// Encodes and decodes cookies at three trust levels, plus flash messages
///
/// Configuration is fixed at construction; the manager is cheap to clone and
/// safe to share between requests.
#[derive(Clone)]
pub struct CookieManager {
    config: CookieConfig,
    keys: Option<CookieKeys>,
}

impl CookieManager {
    /// Create a cookie manager from explicit configuration
    ///
    /// A secret shorter than 32 bytes is discarded rather than truncated or
    /// stretched, so signed, encrypted and flash operations then fail with
    /// [`CookieError::SecretRequired`].
    #[must_use]
    pub fn new(mut config: CookieConfig) -> Self {
        let keys = match config.secret.take() {
            Some(secret) if secret.len() >= MIN_SECRET_LENGTH => Some(CookieKeys {
                encryption_key: derive_encryption_key(secret.as_bytes()),
                signing_key: secret.into_bytes(),
            }),
            Some(secret) => {
                log::warn!(
                    "Cookie secret is {} bytes, at least {MIN_SECRET_LENGTH} required; signed and encrypted cookies are disabled",
                    secret.len()
                );
                None
            }
            None => None,
        };

        Self { config, keys }
    }

    /// Whether signed, encrypted and flash cookies are available
    #[must_use]
    pub const fn has_secret(&self) -> bool {
        self.keys.is_some()
    }

    fn keys(&self) -> Result<&CookieKeys, CookieError> {
        self.keys.as_ref().ok_or(CookieError::SecretRequired)
    }

    /// Build a cookie with the configured attributes
    fn build_cookie(&self, name: &str, value: String, max_age: Option<i64>) -> Cookie<'static> {
        let mut builder = Cookie::build(name.to_owned(), value)
            .path(self.config.path.clone())
            .secure(self.config.secure)
            .http_only(self.config.http_only)
            .same_site(self.config.same_site.into());

        if let Some(domain) = &self.config.domain {
            builder = builder.domain(domain.clone());
        }
        if let Some(seconds) = max_age {
            builder = builder.max_age(Duration::seconds(seconds));
        }

        builder.finish()
    }

    /// Build a clearing cookie: empty value, `Max-Age=-1`
    #[must_use]
    pub fn expired_cookie(&self, name: &str) -> Cookie<'static> {
        self.build_cookie(name, String::new(), Some(-1))
    }

    /// Read a raw cookie value; empty values count as absent
    fn raw_value(req: &HttpRequest, name: &str) -> Result<String, CookieError> {
        req.cookie(name)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(CookieError::NotFound)
    }

    // -------------------------------------------------------------------------
    // Plain
    // -------------------------------------------------------------------------

    /// Write a plain cookie
    pub fn set(&self, res: &mut HttpResponseBuilder, name: &str, value: &str) {
        append_cookie(
            res,
            &self.build_cookie(name, value.to_string(), self.config.max_age_seconds),
        );
    }

    /// Read a plain cookie
    ///
    /// # Errors
    ///
    /// Returns `CookieError::NotFound` when the cookie is absent or cleared
    pub fn get(&self, req: &HttpRequest, name: &str) -> Result<String, CookieError> {
        Self::raw_value(req, name)
    }

    /// Clear a cookie of any kind; safe to repeat
    pub fn delete(&self, res: &mut HttpResponseBuilder, name: &str) {
        append_cookie(res, &self.expired_cookie(name));
    }

    // -------------------------------------------------------------------------
    // Signed
    // -------------------------------------------------------------------------

    /// Encode `value` in the signed wire format
    ///
    /// # Errors
    ///
    /// Returns `CookieError::SecretRequired` without a valid secret
    pub fn sign_value(&self, value: &str) -> Result<String, CookieError> {
        let keys = self.keys()?;
        let signature = sign_hmac_sha256(value.as_bytes(), &keys.signing_key)
            .map_err(|_| CookieError::BadSignature)?;

        Ok(format!(
            "{}{SIGNATURE_SEPARATOR}{}",
            general_purpose::URL_SAFE_NO_PAD.encode(value.as_bytes()),
            general_purpose::URL_SAFE_NO_PAD.encode(signature)
        ))
    }

    /// Decode and verify a value in the signed wire format
    ///
    /// # Errors
    ///
    /// Returns `CookieError::SecretRequired` without a valid secret and
    /// `CookieError::BadSignature` for any malformed or forged input
    pub fn verify_value(&self, signed: &str) -> Result<String, CookieError> {
        let keys = self.keys()?;

        let (payload_b64, signature_b64) = signed
            .split_once(SIGNATURE_SEPARATOR)
            .ok_or(CookieError::BadSignature)?;
        let payload = general_purpose::URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| CookieError::BadSignature)?;
        let signature = general_purpose::URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| CookieError::BadSignature)?;

        if !verify_hmac_sha256(&payload, &keys.signing_key, &signature) {
            return Err(CookieError::BadSignature);
        }

        String::from_utf8(payload).map_err(|_| CookieError::BadSignature)
    }

    /// Write an HMAC-signed cookie
    ///
    /// # Errors
    ///
    /// Returns `CookieError::SecretRequired` without a valid secret
    pub fn set_signed(
        &self,
        res: &mut HttpResponseBuilder,
        name: &str,
        value: &str,
    ) -> Result<(), CookieError> {
        let signed = self.sign_value(value)?;
        append_cookie(res, &self.build_cookie(name, signed, self.config.max_age_seconds));
        Ok(())
    }

    /// Read and verify an HMAC-signed cookie
    ///
    /// # Errors
    ///
    /// Returns `SecretRequired`, `NotFound` or `BadSignature`
    pub fn get_signed(&self, req: &HttpRequest, name: &str) -> Result<String, CookieError> {
        self.keys()?;
        let raw = Self::raw_value(req, name)?;
        self.verify_value(&raw).inspect_err(|_| {
            log::warn!("Rejected cookie '{name}': signature verification failed");
        })
    }

    // -------------------------------------------------------------------------
    // Encrypted
    // -------------------------------------------------------------------------

    /// Encrypt `value` into the encrypted wire format
    ///
    /// # Errors
    ///
    /// Returns `SecretRequired` without a valid secret, or `Encryption` when
    /// the random source or cipher fails
    pub fn encrypt_value(&self, value: &str) -> Result<String, CookieError> {
        let keys = self.keys()?;
        encrypt_bytes(value.as_bytes(), &keys.encryption_key).map_err(CookieError::Encryption)
    }

    /// Decrypt a value in the encrypted wire format
    ///
    /// # Errors
    ///
    /// Returns `SecretRequired` without a valid secret and `DecryptionFailed`
    /// for any decoding, length, tag or UTF-8 failure
    pub fn decrypt_value(&self, encrypted: &str) -> Result<String, CookieError> {
        let keys = self.keys()?;
        let plaintext = decrypt_bytes(encrypted, &keys.encryption_key).map_err(|e| {
            log::debug!("Cookie decryption failed: {e}");
            CookieError::DecryptionFailed
        })?;
        String::from_utf8(plaintext).map_err(|_| CookieError::DecryptionFailed)
    }

    /// Write an AES-256-GCM encrypted cookie
    ///
    /// # Errors
    ///
    /// Returns `SecretRequired` or `Encryption`
    pub fn set_encrypted(
        &self,
        res: &mut HttpResponseBuilder,
        name: &str,
        value: &str,
    ) -> Result<(), CookieError> {
        let encrypted = self.encrypt_value(value)?;
        append_cookie(
            res,
            &self.build_cookie(name, encrypted, self.config.max_age_seconds),
        );
        Ok(())
    }

    /// Read and decrypt an encrypted cookie
    ///
    /// # Errors
    ///
    /// Returns `SecretRequired`, `NotFound` or `DecryptionFailed`
    pub fn get_encrypted(&self, req: &HttpRequest, name: &str) -> Result<String, CookieError> {
        self.keys()?;
        let raw = Self::raw_value(req, name)?;
        self.decrypt_value(&raw).inspect_err(|_| {
            log::warn!("Rejected cookie '{name}': decryption failed");
        })
    }

    // -------------------------------------------------------------------------
    // Flash
    // -------------------------------------------------------------------------

    /// Cookie name used for the flash message `key`
    #[must_use]
    pub fn flash_cookie_name(key: &str) -> String {
        format!("{FLASH_COOKIE_PREFIX}{key}")
    }

    /// Store a one-shot message as an encrypted, browser-session cookie
    ///
    /// # Errors
    ///
    /// Returns `SecretRequired`, `Serialization` or `Encryption`
    pub fn set_flash<T: Serialize + ?Sized>(
        &self,
        res: &mut HttpResponseBuilder,
        key: &str,
        value: &T,
    ) -> Result<(), CookieError> {
        self.keys()?;
        let json = serde_json::to_string(value)?;
        let encrypted = self.encrypt_value(&json)?;
        append_cookie(
            res,
            &self.build_cookie(&Self::flash_cookie_name(key), encrypted, None),
        );
        Ok(())
    }

    /// Read a flash message and clear it in the same response
    ///
    /// The clearing cookie is written as soon as the value decrypts, so the
    /// message is observable at most once per round trip. Two requests racing
    /// ahead of the clearing cookie can both read it; the cookie carries no
    /// server-side state to prevent that.
    ///
    /// # Errors
    ///
    /// Returns `SecretRequired`, `NotFound`, `DecryptionFailed` or
    /// `Serialization` when the payload is not the requested type
    pub fn flash<T: DeserializeOwned>(
        &self,
        res: &mut HttpResponseBuilder,
        req: &HttpRequest,
        key: &str,
    ) -> Result<T, CookieError> {
        let name = Self::flash_cookie_name(key);
        let json = self.get_encrypted(req, &name)?;
        self.delete(res, &name);
        Ok(serde_json::from_str(&json)?)
    }
}
