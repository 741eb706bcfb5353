//! Configuration validation.
//!
//! Serde handles syntax; this module checks semantics. Validation is a pure
//! function returning every problem found, not just the first.

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;
use url::Url;

use crate::config::schema::GatekeeperConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("cors.allowed_origins: '{0}' is not an http(s) origin")]
    InvalidOrigin(String),

    #[error("{field}: '{value}' must start with '/'")]
    InvalidPrefix { field: &'static str, value: String },

    #[error("client_ip.trusted_proxies: '{0}' is not an IP address")]
    InvalidProxy(String),

    #[error("hosts.allowed must not be empty")]
    EmptyHostList,

    #[error("rate_limit.{0} must be greater than zero")]
    ZeroRateLimit(&'static str),
}

/// Validate a configuration, collecting all errors.
pub fn validate_config(config: &GatekeeperConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    check_address(&mut errors, "upstream.address", &config.upstream.address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    for proxy in &config.client_ip.trusted_proxies {
        if proxy.parse::<IpAddr>().is_err() {
            errors.push(ValidationError::InvalidProxy(proxy.clone()));
        }
    }

    if config.hosts.allowed.is_empty() {
        errors.push(ValidationError::EmptyHostList);
    }

    for origin in config
        .cors
        .allowed_origins
        .iter()
        .chain(std::iter::once(&config.cors.development_origin))
    {
        if !is_origin(origin) {
            errors.push(ValidationError::InvalidOrigin(origin.clone()));
        }
    }

    let routes = &config.routes;
    let singles = [
        ("routes.setup_prefix", &routes.setup_prefix),
        ("routes.dashboard_prefix", &routes.dashboard_prefix),
        ("routes.api_prefix", &routes.api_prefix),
        ("routes.admin_prefix", &routes.admin_prefix),
    ];
    for (field, value) in singles {
        check_prefix(&mut errors, field, value);
    }
    let lists = [
        ("routes.protected_api_prefixes", &routes.protected_api_prefixes),
        ("routes.public_api_prefixes", &routes.public_api_prefixes),
        ("routes.excluded_prefixes", &routes.excluded_prefixes),
        ("routes.excluded_paths", &routes.excluded_paths),
    ];
    for (field, values) in lists {
        for value in values {
            check_prefix(&mut errors, field, value);
        }
    }

    if config.rate_limit.window_secs == 0 {
        errors.push(ValidationError::ZeroRateLimit("window_secs"));
    }
    if config.rate_limit.max_requests == 0 {
        errors.push(ValidationError::ZeroRateLimit("max_requests"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_prefix(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if !value.starts_with('/') {
        errors.push(ValidationError::InvalidPrefix {
            field,
            value: value.to_string(),
        });
    }
}

/// An origin is scheme + host (+ port) with nothing after it.
fn is_origin(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some()
                && url.path() == "/"
                && url.query().is_none()
                && !value.ends_with('/')
        }
        Err(_) => false,
    }
}
