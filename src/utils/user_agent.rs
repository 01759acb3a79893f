// User agent extraction, platform detection and device summaries
use actix_web::HttpRequest;

/// User agent information extracted from HTTP headers
#[derive(Debug, Clone)]
pub struct UserAgentInfo {
    pub user_agent: Option<String>,
    pub platform: Option<String>,
    pub mobile: u8, // 0 or 1
}

impl UserAgentInfo {
    /// Human-readable device summary, e.g. `Chrome on macOS`
    #[must_use]
    pub fn device_summary(&self) -> Option<String> {
        let user_agent = self.user_agent.as_deref()?;
        let browser = derive_browser_from_user_agent(user_agent);
        let platform = self.platform.as_deref().unwrap_or("Unknown");

        let mut summary = format!("{browser} on {platform}");
        if self.mobile == 1 {
            summary.push_str(" (mobile)");
        }
        Some(summary)
    }
}

/// Extract user agent information from HTTP request headers
/// Uses the traditional User-Agent header, with client hints filling the platform and mobile flag
#[must_use]
pub fn extract_user_agent_info(req: &HttpRequest) -> UserAgentInfo {
    let headers = req.headers();

    let user_agent = headers
        .get("user-agent")
        .and_then(|h| h.to_str().ok())
        .map(ToString::to_string);

    // Try to get platform from client hints or derive from User-Agent
    let platform = headers
        .get("sec-ch-ua-platform")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.trim_matches('"').to_string())
        .or_else(|| {
            user_agent.as_ref().map_or_else(
                || Some("Unknown".to_string()),
                |ua| Some(derive_platform_from_user_agent(ua)),
            )
        });

    // Detect mobile from client hints, falling back to the User-Agent
    let mobile = headers
        .get("sec-ch-ua-mobile")
        .and_then(|h| h.to_str().ok())
        .map_or_else(
            || {
                u8::from(
                    user_agent
                        .as_deref()
                        .is_some_and(|ua| ua.to_lowercase().contains("mobile")),
                )
            },
            |s| u8::from(s.contains('1')),
        );

    UserAgentInfo {
        user_agent,
        platform,
        mobile,
    }
}

/// Derive platform from User-Agent string
/// Detects common platforms like Windows, macOS, Linux, Android, iOS, Chrome OS
#[must_use]
pub fn derive_platform_from_user_agent(user_agent: &str) -> String {
    let ua_lower = user_agent.to_lowercase();

    if ua_lower.contains("android") {
        "Android".to_string()
    } else if ua_lower.contains("iphone") || ua_lower.contains("ipad") || ua_lower.contains("ios") {
        "iOS".to_string()
    } else if ua_lower.contains("chrome os") || ua_lower.contains("cros") {
        "Chrome OS".to_string()
    } else if ua_lower.contains("windows") {
        "Windows".to_string()
    } else if ua_lower.contains("macintosh") || ua_lower.contains("mac os") {
        "macOS".to_string()
    } else if ua_lower.contains("linux") {
        "Linux".to_string()
    } else {
        "Unknown".to_string()
    }
}

/// Derive browser family from User-Agent string
///
/// Order matters: Edge and Opera embed `Chrome`, Chrome embeds `Safari`.
#[must_use]
pub fn derive_browser_from_user_agent(user_agent: &str) -> String {
    let ua_lower = user_agent.to_lowercase();

    if ua_lower.contains("edg/") || ua_lower.contains("edge") {
        "Edge".to_string()
    } else if ua_lower.contains("opr/") || ua_lower.contains("opera") {
        "Opera".to_string()
    } else if ua_lower.contains("firefox") || ua_lower.contains("fxios") {
        "Firefox".to_string()
    } else if ua_lower.contains("chrome") || ua_lower.contains("crios") {
        "Chrome".to_string()
    } else if ua_lower.contains("safari") {
        "Safari".to_string()
    } else if ua_lower.contains("curl") {
        "curl".to_string()
    } else {
        "Unknown browser".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RequestBuilder;

    #[test]
    fn test_user_agent_extraction() {
        let req = RequestBuilder::client_hints_request();

        let user_agent_info = extract_user_agent_info(&req);

        assert_eq!(
            user_agent_info.user_agent,
            Some("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36".to_string())
        );
        assert_eq!(user_agent_info.platform, Some("Windows".to_string()));
        assert_eq!(user_agent_info.mobile, 0);

        // Platform derived from User-Agent when no client hints are sent
        let req = RequestBuilder::new()
            .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36")
            .build();

        let user_agent_info = extract_user_agent_info(&req);

        assert_eq!(user_agent_info.platform, Some("macOS".to_string()));
        assert_eq!(user_agent_info.mobile, 0);
    }

    #[test]
    fn test_missing_user_agent() {
        let info = extract_user_agent_info(&RequestBuilder::empty_request());

        assert!(info.user_agent.is_none());
        assert_eq!(info.platform, Some("Unknown".to_string()));
        assert!(info.device_summary().is_none());
    }

    #[test]
    fn test_platform_derivation_from_user_agent() {
        assert_eq!(
            derive_platform_from_user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64)"),
            "Windows"
        );
        assert_eq!(
            derive_platform_from_user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)"),
            "macOS"
        );
        assert_eq!(
            derive_platform_from_user_agent("Mozilla/5.0 (X11; Linux x86_64)"),
            "Linux"
        );
        assert_eq!(
            derive_platform_from_user_agent("Mozilla/5.0 (Linux; Android 11; SM-G991B)"),
            "Android"
        );
        assert_eq!(
            derive_platform_from_user_agent(
                "Mozilla/5.0 (iPhone; CPU iPhone OS 15_0 like Mac OS X)"
            ),
            "iOS"
        );
        assert_eq!(
            derive_platform_from_user_agent("Mozilla/5.0 (X11; CrOS x86_64 14541.0.0)"),
            "Chrome OS"
        );
        assert_eq!(
            derive_platform_from_user_agent("Mozilla/5.0 (Unknown Platform)"),
            "Unknown"
        );
    }

    #[test]
    fn test_browser_derivation() {
        assert_eq!(
            derive_browser_from_user_agent(
                "Mozilla/5.0 (Windows NT 10.0) AppleWebKit/537.36 Chrome/120.0 Safari/537.36 Edg/120.0"
            ),
            "Edge"
        );
        assert_eq!(
            derive_browser_from_user_agent(
                "Mozilla/5.0 (Macintosh) AppleWebKit/537.36 Chrome/120.0 Safari/537.36"
            ),
            "Chrome"
        );
        assert_eq!(
            derive_browser_from_user_agent(
                "Mozilla/5.0 (iPhone) AppleWebKit/605.1.15 Version/17.0 Mobile/15E148 Safari/604.1"
            ),
            "Safari"
        );
        assert_eq!(
            derive_browser_from_user_agent("Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Firefox/121.0"),
            "Firefox"
        );
        assert_eq!(derive_browser_from_user_agent("curl/7.68.0"), "curl");
    }

    #[test]
    fn test_device_summary() {
        let req = RequestBuilder::mobile("/");
        let info = extract_user_agent_info(&req);

        assert_eq!(info.mobile, 1);
        assert_eq!(
            info.device_summary(),
            Some("Safari on iOS (mobile)".to_string())
        );
    }
}
