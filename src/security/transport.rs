//! Transport and host policy: HTTPS enforcement and the host allow-list.

use crate::config::HostConfig;

/// True when the declared protocol is `https`.
pub fn is_secure(forwarded_proto: Option<&str>) -> bool {
    forwarded_proto
        .map(|p| p.trim().eq_ignore_ascii_case("https"))
        .unwrap_or(false)
}

/// Build the `https://` equivalent of a request URL.
pub fn https_location(host: &str, path: &str, query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("https://{}{}?{}", host, path, q),
        _ => format!("https://{}{}", host, path),
    }
}

/// Host allow-list, normalized to lowercase.
#[derive(Debug, Clone)]
pub struct HostPolicy {
    allowed: Vec<String>,
}

impl HostPolicy {
    pub fn new(config: &HostConfig) -> Self {
        Self {
            allowed: config.allowed.iter().map(|h| h.to_ascii_lowercase()).collect(),
        }
    }

    pub fn allows(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        self.allowed.iter().any(|h| *h == host)
    }

    /// Host used when a request carries none.
    pub fn canonical(&self) -> Option<&str> {
        self.allowed.first().map(String::as_str)
    }
}
