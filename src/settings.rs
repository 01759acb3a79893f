use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::session::{
    CookieConfig, FingerprintMode, FingerprintStrictness, SameSitePolicy, SessionConfig,
    DEFAULT_SESSION_COOKIE_NAME, DEFAULT_SESSION_MAX_AGE_SECONDS,
};

/// Environment variable naming a directory with a higher-priority `Settings.toml`
pub const SECRETS_DIR_ENV: &str = "SESSIONVAULT_SECRETS_DIR";

const SETTINGS_FILE: &str = "Settings.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SessionVaultSettings {
    pub session: SessionSettings,
    pub cookies: CookieSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub cookie_name: String,
    /// Session lifetime in seconds, for both the record and the cookie
    pub max_age_seconds: i64,
    pub domain: Option<String>,
    pub path: String,
    pub http_only: bool,
    pub same_site: SameSitePolicy,
    pub fingerprint_mode: FingerprintMode,
    pub fingerprint_strictness: FingerprintStrictness,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieSettings {
    /// Secret for signed, encrypted and flash cookies (at least 32 bytes)
    pub secret: Option<String>,
    /// Applies to the session cookie as well
    pub secure: bool,
    pub domain: Option<String>,
    pub path: String,
    pub http_only: bool,
    pub same_site: SameSitePolicy,
    pub max_age_seconds: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Logger filter in `RUST_LOG` syntax, e.g. `info` or `sessionvault=debug,warn`
    pub level: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_SESSION_COOKIE_NAME.to_string(),
            max_age_seconds: DEFAULT_SESSION_MAX_AGE_SECONDS,
            domain: None,
            path: "/".to_string(),
            http_only: true,
            same_site: SameSitePolicy::Lax,
            fingerprint_mode: FingerprintMode::Disabled,
            fingerprint_strictness: FingerprintStrictness::Warn,
        }
    }
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            secret: None,
            secure: true, // Default to secure cookies
            domain: None,
            path: "/".to_string(),
            http_only: true,
            same_site: SameSitePolicy::Lax,
            max_age_seconds: None,
        }
    }
}

impl std::fmt::Debug for CookieSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieSettings")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("secure", &self.secure)
            .field("domain", &self.domain)
            .field("path", &self.path)
            .field("http_only", &self.http_only)
            .field("same_site", &self.same_site)
            .field("max_age_seconds", &self.max_age_seconds)
            .finish()
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl SessionVaultSettings {
    /// Load settings from configuration files and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Settings file cannot be read
    /// - TOML parsing fails
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_env_file();

        let secrets_dir = std::env::var(SECRETS_DIR_ENV).ok().map(PathBuf::from);
        let mut settings =
            Self::load_base_settings(Path::new(SETTINGS_FILE), secrets_dir.as_deref())?;

        Self::apply_env_overrides(&mut settings);
        settings.initialize_logging();

        if settings.cookies.secret.is_none() {
            log::warn!(
                "No cookie secret configured; signed, encrypted and flash cookies are disabled"
            );
        }

        Ok(settings)
    }

    /// Logger filtered by `logging.level`
    #[must_use]
    pub fn logger_builder(&self) -> env_logger::Builder {
        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&self.logging.level);
        builder
    }

    /// Install the logger, keeping an already installed one
    fn initialize_logging(&self) {
        if let Err(e) = self.logger_builder().try_init() {
            log::debug!("Logger already initialized: {e}");
        }
    }

    /// Load base settings from TOML file(s) or use defaults
    ///
    /// Settings are loaded with the following priority (highest to lowest):
    /// 1. Environment variables (applied separately after loading base settings)
    /// 2. Settings.toml in `SESSIONVAULT_SECRETS_DIR` (if specified and exists)
    /// 3. Settings.toml in current directory (if exists)
    /// 4. Default settings
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file cannot be read or parsed
    fn load_base_settings(
        default_path: &Path,
        secrets_dir: Option<&Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings = Self::default();

        if default_path.exists() {
            let toml_content = fs::read_to_string(default_path)?;
            settings = basic_toml::from_str(&toml_content)?;
            log::info!("Loaded base settings from {}", default_path.display());
        }

        if let Some(secrets_dir) = secrets_dir {
            let secrets_path = secrets_dir.join(SETTINGS_FILE);
            if secrets_path.exists() {
                let secrets_toml_content = fs::read_to_string(&secrets_path)?;
                settings = basic_toml::from_str(&secrets_toml_content)?;
                log::info!("Overriding settings from {}", secrets_path.display());
            } else {
                log::info!(
                    "{SECRETS_DIR_ENV} set but no Settings.toml found at: {}",
                    secrets_path.display()
                );
            }
        }

        Ok(settings)
    }

    /// Apply environment variable overrides to settings
    fn apply_env_overrides(settings: &mut Self) {
        Self::apply_session_env_overrides(&mut settings.session);
        Self::apply_cookie_env_overrides(&mut settings.cookies);
        Self::apply_logging_env_overrides(&mut settings.logging);
    }

    /// Apply environment overrides for session settings
    pub fn apply_session_env_overrides(session_settings: &mut SessionSettings) {
        if let Ok(cookie_name) = std::env::var("SESSION_COOKIE_NAME") {
            if !cookie_name.is_empty() {
                session_settings.cookie_name = cookie_name;
            }
        }
        Self::apply_parsed_env_override(
            "SESSION_MAX_AGE_SECONDS",
            &mut session_settings.max_age_seconds,
        );
        if let Ok(domain) = std::env::var("SESSION_COOKIE_DOMAIN") {
            session_settings.domain = Some(domain).filter(|d| !d.is_empty());
        }
        if let Ok(path) = std::env::var("SESSION_COOKIE_PATH") {
            session_settings.path = path;
        }
        Self::apply_parsed_env_override(
            "SESSION_FINGERPRINT_MODE",
            &mut session_settings.fingerprint_mode,
        );
        Self::apply_parsed_env_override(
            "SESSION_FINGERPRINT_STRICTNESS",
            &mut session_settings.fingerprint_strictness,
        );
    }

    /// Apply environment overrides for cookie settings
    pub fn apply_cookie_env_overrides(cookie_settings: &mut CookieSettings) {
        Self::apply_parsed_env_override("COOKIE_SECURE", &mut cookie_settings.secure);
        if let Ok(secret) = std::env::var("COOKIE_SECRET") {
            if !secret.is_empty() {
                cookie_settings.secret = Some(secret);
            }
        }
    }

    /// Apply environment overrides for logging settings
    fn apply_logging_env_overrides(logging_settings: &mut LoggingSettings) {
        if let Ok(log_level) = std::env::var("RUST_LOG") {
            logging_settings.level = log_level;
        }
    }

    /// Helper function to apply parsed environment variable overrides
    ///
    /// Unparseable values are ignored with a warning.
    fn apply_parsed_env_override<T>(env_var: &str, target: &mut T)
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        if let Ok(value_str) = std::env::var(env_var) {
            match value_str.parse::<T>() {
                Ok(value) => *target = value,
                Err(e) => log::warn!("Ignoring invalid {env_var}={value_str}: {e}"),
            }
        }
    }

    /// Load environment variables from .env file
    fn load_env_file() {
        if let Ok(contents) = std::fs::read_to_string(".env") {
            for line in contents.lines() {
                let line = line.trim();
                if line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    std::env::set_var(key.trim(), value.trim());
                }
            }
        }
    }

    /// Session manager configuration from these settings
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            cookie_name: self.session.cookie_name.clone(),
            max_age_seconds: self.session.max_age_seconds,
            domain: self.session.domain.clone(),
            path: self.session.path.clone(),
            secure: self.cookies.secure,
            http_only: self.session.http_only,
            same_site: self.session.same_site,
            fingerprint_mode: self.session.fingerprint_mode,
            fingerprint_strictness: self.session.fingerprint_strictness,
        }
    }

    /// Cookie manager configuration from these settings
    #[must_use]
    pub fn cookie_config(&self) -> CookieConfig {
        CookieConfig {
            secret: self.cookies.secret.clone(),
            path: self.cookies.path.clone(),
            domain: self.cookies.domain.clone(),
            secure: self.cookies.secure,
            http_only: self.cookies.http_only,
            same_site: self.cookies.same_site,
            max_age_seconds: self.cookies.max_age_seconds,
        }
    }
}
