//! Client Context Resolver
//!
//! Resolves the client IP (proxy/CDN aware) and user-agent from request
//! headers. Pure functions, no state.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use serde::{Deserialize, Serialize};

/// Forwarding headers in priority order
const IP_HEADERS: &[&str] = &[
    "cf-connecting-ip",
    "x-forwarded-for",
    "x-real-ip",
    "x-forwarded",
    "forwarded",
    "x-client-ip",
];

// ============================================================================
// REQUEST HEADERS
// ============================================================================

/// Case-insensitive header map plus the socket peer address
#[derive(Debug, Clone, Default)]
pub struct RequestHeaders {
    headers: HashMap<String, String>,
    remote_addr: Option<String>,
}

impl RequestHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.insert(name, value);
        self
    }

    pub fn with_remote_addr(mut self, addr: &str) -> Self {
        self.remote_addr = Some(addr.to_string());
        self
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.headers.insert(name.to_ascii_lowercase(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    pub fn remote_addr(&self) -> Option<&str> {
        self.remote_addr.as_deref()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for RequestHeaders {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = RequestHeaders::new();
        for (k, v) in iter {
            headers.insert(k.as_ref(), v.as_ref());
        }
        headers
    }
}

// ============================================================================
// CLIENT CONTEXT
// ============================================================================

/// Who sent the request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientContext {
    pub ip: String,
    pub user_agent: String,
}

impl ClientContext {
    pub fn new(ip: &str, user_agent: &str) -> Self {
        Self {
            ip: ip.to_string(),
            user_agent: user_agent.to_string(),
        }
    }

    /// Resolve from request headers
    pub fn resolve(headers: &RequestHeaders) -> Self {
        Self {
            ip: resolve_client_ip(headers),
            user_agent: headers.get("user-agent").unwrap_or_default().to_string(),
        }
    }
}

/// First public IP found in the forwarding headers, else `REMOTE_ADDR`.
///
/// `REMOTE_ADDR` is returned even when private; the technical analyzer
/// scores that. Empty when nothing is known.
pub fn resolve_client_ip(headers: &RequestHeaders) -> String {
    for name in IP_HEADERS {
        let Some(value) = headers.get(name) else {
            continue;
        };

        let candidates: Vec<String> = if *name == "forwarded" {
            forwarded_for_tokens(value)
        } else {
            value.split(',').map(|s| s.trim().to_string()).collect()
        };

        if let Some(ip) = candidates.into_iter().find(|c| is_public_ip(c)) {
            return ip;
        }
    }

    headers
        .remote_addr()
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// `for=` values of an RFC 7239 `Forwarded` header, quotes, brackets and
/// ports stripped
fn forwarded_for_tokens(value: &str) -> Vec<String> {
    value
        .split(|c| c == ',' || c == ';')
        .filter_map(|part| {
            let (key, val) = part.trim().split_once('=')?;
            if !key.trim().eq_ignore_ascii_case("for") {
                return None;
            }
            let val = val.trim().trim_matches('"');
            let host = if let Some(rest) = val.strip_prefix('[') {
                rest.split(']').next().unwrap_or_default()
            } else if val.matches(':').count() == 1 {
                val.split(':').next().unwrap_or_default()
            } else {
                val
            };
            Some(host.to_string())
        })
        .collect()
}

/// Valid IP outside private and reserved ranges
pub fn is_public_ip(candidate: &str) -> bool {
    match candidate.trim().parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => is_public_v4(&v4),
        Ok(IpAddr::V6(v6)) => is_public_v6(&v6),
        Err(_) => false,
    }
}

fn is_public_v4(ip: &Ipv4Addr) -> bool {
    let first = ip.octets()[0];
    !(ip.is_private()
        || ip.is_loopback()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast()
        || first == 0
        || first >= 240)
}

fn is_public_v6(ip: &Ipv6Addr) -> bool {
    if let Some(v4) = ip.to_ipv4_mapped() {
        return is_public_v4(&v4);
    }
    let first = ip.segments()[0];
    !(ip.is_loopback()
        || ip.is_unspecified()
        || (first & 0xfe00) == 0xfc00 // unique local
        || (first & 0xffc0) == 0xfe80) // link local
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cloudflare_header_wins() {
        let headers = RequestHeaders::new()
            .with_header("CF-Connecting-IP", "81.2.69.142")
            .with_header("X-Forwarded-For", "8.8.8.8")
            .with_remote_addr("10.0.0.1");
        assert_eq!(resolve_client_ip(&headers), "81.2.69.142");
    }

    #[test]
    fn test_forwarded_for_skips_private_hops() {
        let headers = RequestHeaders::new()
            .with_header("x-forwarded-for", "10.1.1.1, 192.168.0.4, 81.2.69.142");
        assert_eq!(resolve_client_ip(&headers), "81.2.69.142");
    }

    #[test]
    fn test_rfc7239_forwarded_header() {
        let headers = RequestHeaders::new()
            .with_header("Forwarded", "for=\"[2001:4860:4860::8888]:443\";proto=https, for=10.0.0.2");
        assert_eq!(resolve_client_ip(&headers), "2001:4860:4860::8888");

        let v4 = RequestHeaders::new().with_header("Forwarded", "for=81.2.69.142:8080;by=10.0.0.1");
        assert_eq!(resolve_client_ip(&v4), "81.2.69.142");
    }

    #[test]
    fn test_falls_back_to_remote_addr() {
        let headers = RequestHeaders::new()
            .with_header("X-Real-IP", "127.0.0.1")
            .with_remote_addr("192.168.1.20");
        assert_eq!(resolve_client_ip(&headers), "192.168.1.20");

        assert_eq!(resolve_client_ip(&RequestHeaders::new()), "");
    }

    #[test]
    fn test_public_ip_validation() {
        assert!(is_public_ip("81.2.69.142"));
        assert!(is_public_ip("2001:4860:4860::8888"));
        assert!(!is_public_ip("10.0.0.1"));
        assert!(!is_public_ip("172.16.5.5"));
        assert!(!is_public_ip("127.0.0.1"));
        assert!(!is_public_ip("169.254.1.1"));
        assert!(!is_public_ip("0.0.0.0"));
        assert!(!is_public_ip("fd00::1"));
        assert!(!is_public_ip("::1"));
        assert!(!is_public_ip("not-an-ip"));
        assert!(!is_public_ip(""));
    }

    #[test]
    fn test_resolve_user_agent() {
        let headers: RequestHeaders = [("User-Agent", "Mozilla/5.0"), ("X-Client-IP", "81.2.69.142")]
            .into_iter()
            .collect();
        let ctx = ClientContext::resolve(&headers);
        assert_eq!(ctx, ClientContext::new("81.2.69.142", "Mozilla/5.0"));
    }
}
