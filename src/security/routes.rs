//! Path classification.
//!
//! Classification is pure: it tells the caller what kind of route a path is
//! and leaves the decision to act on it to the gatekeeper's policy.

use crate::config::RoutesConfig;

/// How an API path is treated for credential purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiRoute {
    /// Matches a public exemption prefix.
    Public,
    /// Matches a protected prefix and no exemption.
    Protected,
    /// Under the API namespace but in neither table.
    Unlisted,
}

/// Immutable prefix tables.
#[derive(Debug, Clone)]
pub struct RouteTable {
    setup: String,
    dashboard: String,
    api: String,
    admin: String,
    protected: Vec<String>,
    public: Vec<String>,
    excluded_prefixes: Vec<String>,
    excluded_paths: Vec<String>,
}

impl RouteTable {
    pub fn new(config: &RoutesConfig) -> Self {
        Self {
            setup: config.setup_prefix.clone(),
            dashboard: config.dashboard_prefix.clone(),
            api: config.api_prefix.clone(),
            admin: config.admin_prefix.clone(),
            protected: config.protected_api_prefixes.clone(),
            public: config.public_api_prefixes.clone(),
            excluded_prefixes: config.excluded_prefixes.clone(),
            excluded_paths: config.excluded_paths.clone(),
        }
    }

    /// Static assets and the favicon never reach the gatekeeper.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.excluded_paths.iter().any(|p| p == path)
            || self.excluded_prefixes.iter().any(|p| path.starts_with(p.as_str()))
    }

    pub fn is_setup(&self, path: &str) -> bool {
        path.starts_with(self.setup.as_str())
    }

    pub fn is_api(&self, path: &str) -> bool {
        path.starts_with(self.api.as_str())
    }

    pub fn is_admin(&self, path: &str) -> bool {
        path.starts_with(self.admin.as_str())
    }

    /// Dashboard and API responses must never be cached.
    pub fn is_uncacheable(&self, path: &str) -> bool {
        path.starts_with(self.dashboard.as_str()) || self.is_api(path)
    }

    /// Classify an API path. Returns `None` outside the API namespace.
    pub fn classify(&self, path: &str) -> Option<ApiRoute> {
        if !self.is_api(path) {
            return None;
        }
        let public = self.public.iter().any(|p| path.starts_with(p.as_str()));
        let protected = self.protected.iter().any(|p| path.starts_with(p.as_str()));

        Some(if public {
            ApiRoute::Public
        } else if protected {
            ApiRoute::Protected
        } else {
            ApiRoute::Unlisted
        })
    }
}
