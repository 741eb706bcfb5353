//! CORS preflight answers for allow-listed origins.

use axum::http::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE,
};

use crate::config::CorsConfig;

/// Origin allow-list plus the preflight header values.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    origins: Vec<String>,
    allow_methods: HeaderValue,
    allow_headers: HeaderValue,
    max_age: HeaderValue,
}

impl CorsPolicy {
    /// Build the policy. Outside production the development origin is
    /// accepted as well.
    pub fn new(config: &CorsConfig, production: bool) -> Self {
        let mut origins = config.allowed_origins.clone();
        if !production {
            origins.push(config.development_origin.clone());
        }

        Self {
            origins,
            allow_methods: header_value(&config.allow_methods),
            allow_headers: header_value(&config.allow_headers),
            max_age: HeaderValue::from(config.max_age_secs),
        }
    }

    pub fn allows(&self, origin: &str) -> bool {
        self.origins.iter().any(|o| o == origin)
    }

    /// Add preflight headers for `origin`. Returns false, leaving `headers`
    /// untouched, when the origin is not allow-listed.
    pub fn apply_preflight(&self, origin: &str, headers: &mut HeaderMap) -> bool {
        if !self.allows(origin) {
            return false;
        }
        let Ok(origin) = HeaderValue::from_str(origin) else {
            return false;
        };

        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        headers.insert(ACCESS_CONTROL_ALLOW_METHODS, self.allow_methods.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, self.allow_headers.clone());
        headers.insert(ACCESS_CONTROL_MAX_AGE, self.max_age.clone());
        true
    }
}

fn header_value(value: &str) -> HeaderValue {
    HeaderValue::from_str(value).unwrap_or_else(|_| HeaderValue::from_static(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_origin_gets_preflight_headers() {
        let policy = CorsPolicy::new(&CorsConfig::default(), true);
        let mut headers = HeaderMap::new();

        assert!(policy.apply_preflight("https://app.activebackoffice.com", &mut headers));
        assert_eq!(
            headers[ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://app.activebackoffice.com"
        );
        assert_eq!(
            headers[ACCESS_CONTROL_ALLOW_METHODS],
            "GET, POST, PUT, DELETE, OPTIONS"
        );
        assert_eq!(
            headers[ACCESS_CONTROL_ALLOW_HEADERS],
            "Content-Type, Authorization"
        );
        assert_eq!(headers[ACCESS_CONTROL_MAX_AGE], "86400");
    }

    #[test]
    fn test_unknown_origin_gets_nothing() {
        let policy = CorsPolicy::new(&CorsConfig::default(), true);
        let mut headers = HeaderMap::new();

        assert!(!policy.apply_preflight("https://evil.example.com", &mut headers));
        assert!(headers.is_empty());
    }

    #[test]
    fn test_development_origin_only_outside_production() {
        let config = CorsConfig::default();
        assert!(!CorsPolicy::new(&config, true).allows("http://localhost:3000"));
        assert!(CorsPolicy::new(&config, false).allows("http://localhost:3000"));
    }
}
