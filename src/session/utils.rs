//! Session utility functions
//!
//! Request-context helpers shared by session creation and fingerprinting.

use actix_web::HttpRequest;

use crate::utils::user_agent::{extract_user_agent_info, UserAgentInfo};

/// Extract client information from the request
///
/// Returns the client IP address (honouring `Forwarded` / `X-Forwarded-For`,
/// falling back to the peer address) and user agent information extracted
/// from the HTTP request headers.
pub fn extract_client_info(req: &HttpRequest) -> (Option<String>, UserAgentInfo) {
    let client_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(strip_port);

    let user_agent_info = extract_user_agent_info(req);

    (client_ip, user_agent_info)
}

/// Drop a trailing `:port` from an IPv4 or bracketed IPv6 address
fn strip_port(addr: &str) -> String {
    if let Some(rest) = addr.strip_prefix('[') {
        // [::1]:8080
        return rest.split(']').next().unwrap_or(rest).to_string();
    }
    match addr.rsplit_once(':') {
        // Only strip when exactly one colon is present; bare IPv6 has several
        Some((host, port)) if !host.contains(':') && port.chars().all(|c| c.is_ascii_digit()) => {
            host.to_string()
        }
        _ => addr.to_string(),
    }
}
