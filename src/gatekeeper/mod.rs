//! Edge request gatekeeper.
//!
//! # Data Flow
//! ```text
//! RequestInfo
//!     → protocol      (production: non-https → 301)
//!     → host          (production: unknown Host → 400)
//!     → rate limit    (over cap → 429 + Retry-After)
//!     → bot tagging   (observe only)
//!     → setup bypass  (security headers, forward)
//!     → API classification (reject only when enforcement is on)
//!     → CORS preflight
//!     → admin-path observation
//!     → security headers, cache suppression
//!     → Verdict
//! ```
//!
//! Every step is synchronous. The rate-limit ledger is the only shared
//! state and is safe under concurrent evaluation.

pub mod middleware;
pub mod request;
pub mod verdict;

use std::net::IpAddr;
use std::sync::Arc;

use axum::http::{HeaderMap, Method};

use crate::config::GatekeeperConfig;
use crate::observability::{metrics, Observer, SecurityEvent};
use crate::security::headers::{apply_no_cache, apply_security_headers};
use crate::security::{bots, transport};
use crate::security::{ApiRoute, Clock, CorsPolicy, HostPolicy, RateLimiter, RouteTable, SystemClock};

pub use middleware::{gatekeeper_middleware, protect};
pub use request::RequestInfo;
pub use verdict::{Rejection, Verdict};

/// Used in redirects when neither the request nor the allow-list names a host.
const FALLBACK_HOST: &str = "localhost";

/// Request-boundary policy, built once from configuration.
#[derive(Debug)]
pub struct Gatekeeper {
    production: bool,
    hosts: HostPolicy,
    limiter: RateLimiter,
    routes: RouteTable,
    cors: CorsPolicy,
    auth_enforcement: bool,
    session_cookies: Vec<String>,
    trusted_proxies: Vec<IpAddr>,
}

impl Gatekeeper {
    pub fn new(config: &GatekeeperConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build with a custom ledger clock.
    pub fn with_clock(config: &GatekeeperConfig, clock: Arc<dyn Clock>) -> Self {
        let production = config.is_production();
        Self {
            production,
            hosts: HostPolicy::new(&config.hosts),
            limiter: RateLimiter::with_clock(&config.rate_limit, clock),
            routes: RouteTable::new(&config.routes),
            cors: CorsPolicy::new(&config.cors, production),
            auth_enforcement: config.routes.auth_enforcement,
            session_cookies: config.routes.session_cookies.clone(),
            trusted_proxies: config
                .client_ip
                .trusted_proxies
                .iter()
                .filter_map(|p| p.parse().ok())
                .collect(),
        }
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn session_cookies(&self) -> &[String] {
        &self.session_cookies
    }

    /// Peers allowed to name the client through forwarding headers.
    pub fn trusted_proxies(&self) -> &[IpAddr] {
        &self.trusted_proxies
    }

    /// Decide what happens to one request.
    pub fn evaluate(&self, req: &RequestInfo) -> Verdict {
        if self.routes.is_excluded(&req.path) {
            return Verdict::Pass;
        }

        let url = req.url();
        let observer = Observer {
            production: self.production,
            client_ip: &req.client_ip,
            user_agent: &req.user_agent,
            url: &url,
        };

        if self.production {
            if !transport::is_secure(req.forwarded_proto.as_deref()) {
                // Never redirect to a host outside the allow-list.
                let host = req
                    .host
                    .as_deref()
                    .filter(|h| self.hosts.allows(h))
                    .or(self.hosts.canonical())
                    .unwrap_or(FALLBACK_HOST);
                let location = transport::https_location(host, &req.path, req.query.as_deref());
                observer.record(
                    SecurityEvent::InsecureProtocol,
                    req.forwarded_proto.as_deref().unwrap_or("none"),
                );
                return Verdict::Redirect(location);
            }

            if let Some(host) = req.host.as_deref() {
                if !self.hosts.allows(host) {
                    observer.record(SecurityEvent::InvalidHost, host);
                    return Verdict::Reject(Rejection::InvalidHost);
                }
            }
        }

        let admitted = self.limiter.try_acquire(&req.client_ip);
        metrics::record_ledger_size(self.limiter.len());
        if !admitted {
            observer.record(SecurityEvent::RateLimitExceeded, "window cap reached");
            metrics::record_rate_limited();
            return Verdict::Reject(Rejection::TooManyRequests {
                retry_after_secs: self.limiter.retry_after_secs(),
            });
        }

        if bots::is_bot(&req.user_agent) {
            observer.record(SecurityEvent::BotDetected, &req.user_agent);
            metrics::record_bot();
        }

        let mut headers = HeaderMap::new();

        // Onboarding runs before any account or session exists.
        if self.routes.is_setup(&req.path) {
            apply_security_headers(&mut headers);
            return Verdict::Forward(headers);
        }

        if self.routes.classify(&req.path) == Some(ApiRoute::Protected)
            && self.auth_enforcement
            && !req.has_authorization
            && !req.has_session
        {
            observer.record(SecurityEvent::UnauthenticatedApi, "missing credentials");
            return Verdict::Reject(Rejection::Unauthorized);
        }

        if req.method == Method::OPTIONS {
            if let Some(origin) = req.origin.as_deref() {
                self.cors.apply_preflight(origin, &mut headers);
            }
        }

        if self.routes.is_admin(&req.path) {
            let details = if req.has_session {
                "session cookie present"
            } else {
                "no session cookie"
            };
            observer.record(SecurityEvent::AdminAccess, details);
        }

        apply_security_headers(&mut headers);
        if self.routes.is_uncacheable(&req.path) {
            apply_no_cache(&mut headers);
        }

        Verdict::Forward(headers)
    }
}
