//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gatekeeper.
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so a missing file yields a working setup.

use serde::{Deserialize, Serialize};

/// Length of one rate-limit window, in seconds (15 minutes).
pub const DEFAULT_WINDOW_SECS: u64 = 15 * 60;

/// Requests admitted per client per window.
pub const DEFAULT_MAX_REQUESTS: u32 = 1000;

/// Root configuration for the gatekeeper.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatekeeperConfig {
    /// Deployment mode. Protocol and host checks only run in production.
    pub mode: Mode,

    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Where forwarded requests go.
    pub upstream: UpstreamConfig,

    /// Allow-listed `Host` values.
    pub hosts: HostConfig,

    /// CORS origin allow-list and preflight answers.
    pub cors: CorsConfig,

    /// Path prefix tables.
    pub routes: RoutesConfig,

    /// Rate limiting configuration.
    pub rate_limit: RateLimitConfig,

    /// How the client identifier is derived.
    pub client_ip: ClientIpConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl GatekeeperConfig {
    /// Shorthand for `mode == Mode::Production`.
    pub fn is_production(&self) -> bool {
        self.mode == Mode::Production
    }
}

/// Deployment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Production,
    #[default]
    Development,
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Mode::Production),
            "development" | "dev" => Ok(Mode::Development),
            other => Err(format!("unknown mode '{}'", other)),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Upstream application server.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Upstream address (e.g., "127.0.0.1:3000").
    pub address: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Host allow-list.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HostConfig {
    /// Accepted `Host` header values. Compared case-insensitively.
    pub allowed: Vec<String>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            allowed: vec![
                "activebackoffice.com".to_string(),
                "www.activebackoffice.com".to_string(),
                "app.activebackoffice.com".to_string(),
            ],
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed to receive preflight headers.
    pub allowed_origins: Vec<String>,

    /// Extra origin accepted outside production.
    pub development_origin: String,

    /// Value of `Access-Control-Allow-Methods`.
    pub allow_methods: String,

    /// Value of `Access-Control-Allow-Headers`.
    pub allow_headers: String,

    /// Value of `Access-Control-Max-Age`, in seconds.
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "https://activebackoffice.com".to_string(),
                "https://www.activebackoffice.com".to_string(),
                "https://app.activebackoffice.com".to_string(),
            ],
            development_origin: "http://localhost:3000".to_string(),
            allow_methods: "GET, POST, PUT, DELETE, OPTIONS".to_string(),
            allow_headers: "Content-Type, Authorization".to_string(),
            max_age_secs: 86_400,
        }
    }
}

/// Path prefix tables used to classify requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Onboarding flow, reachable before any account exists.
    pub setup_prefix: String,

    /// Dashboard pages (never cached).
    pub dashboard_prefix: String,

    /// API namespace (never cached, classified).
    pub api_prefix: String,

    /// Platform administration pages (access is logged).
    pub admin_prefix: String,

    /// API prefixes that nominally require credentials.
    pub protected_api_prefixes: Vec<String>,

    /// API prefixes exempt from credential requirements.
    pub public_api_prefixes: Vec<String>,

    /// Reject protected API routes lacking credentials. Off by default:
    /// downstream handlers own authentication.
    pub auth_enforcement: bool,

    /// Cookies whose presence marks a session.
    pub session_cookies: Vec<String>,

    /// Prefixes the gatekeeper never runs on.
    pub excluded_prefixes: Vec<String>,

    /// Exact paths the gatekeeper never runs on.
    pub excluded_paths: Vec<String>,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            setup_prefix: "/setup".to_string(),
            dashboard_prefix: "/dashboard".to_string(),
            api_prefix: "/api/".to_string(),
            admin_prefix: "/platform-admin".to_string(),
            protected_api_prefixes: vec![
                "/api/entities".to_string(),
                "/api/users".to_string(),
                "/api/integrations".to_string(),
                "/api/api-keys".to_string(),
                "/api/platform-admin".to_string(),
            ],
            public_api_prefixes: vec![
                "/api/auth".to_string(),
                "/api/health".to_string(),
                "/api/setup".to_string(),
                "/api/integrations/callback".to_string(),
            ],
            auth_enforcement: false,
            session_cookies: vec![
                "abo.session-token".to_string(),
                "__Secure-abo.session-token".to_string(),
            ],
            excluded_prefixes: vec!["/_next/static".to_string(), "/_next/image".to_string()],
            excluded_paths: vec!["/favicon.ico".to_string()],
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Fixed window length in seconds.
    pub window_secs: u64,

    /// Maximum requests per client per window.
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: DEFAULT_WINDOW_SECS,
            max_requests: DEFAULT_MAX_REQUESTS,
        }
    }
}

/// Client identifier resolution.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientIpConfig {
    /// Peers whose `X-Real-IP`/`X-Forwarded-For` headers are believed.
    /// Empty means the TCP peer address is always used.
    pub trusted_proxies: Vec<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
