//! Security observations.
//!
//! Policy violations and soft signals are not errors; they are recorded as
//! structured events on the `security` target. Production raises them to
//! warn so they survive the default filter.

use std::fmt;

/// Kinds of security observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityEvent {
    InsecureProtocol,
    InvalidHost,
    RateLimitExceeded,
    BotDetected,
    AdminAccess,
    UnauthenticatedApi,
}

impl SecurityEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            SecurityEvent::InsecureProtocol => "insecure_protocol",
            SecurityEvent::InvalidHost => "invalid_host",
            SecurityEvent::RateLimitExceeded => "rate_limit_exceeded",
            SecurityEvent::BotDetected => "bot_detected",
            SecurityEvent::AdminAccess => "admin_access",
            SecurityEvent::UnauthenticatedApi => "unauthenticated_api",
        }
    }
}

impl fmt::Display for SecurityEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who triggered an observation.
#[derive(Debug, Clone, Copy)]
pub struct Observer<'a> {
    pub production: bool,
    pub client_ip: &'a str,
    pub user_agent: &'a str,
    pub url: &'a str,
}

impl Observer<'_> {
    /// Emit one observation with a free-form detail string.
    pub fn record(&self, event: SecurityEvent, details: &str) {
        if self.production {
            tracing::warn!(
                target: "security",
                event = %event,
                details,
                client_ip = self.client_ip,
                user_agent = self.user_agent,
                url = self.url,
                "Security event"
            );
        } else {
            tracing::debug!(
                target: "security",
                event = %event,
                details,
                client_ip = self.client_ip,
                user_agent = self.user_agent,
                url = self.url,
                "Security event"
            );
        }
    }
}
