//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, environment overrides)
//!     → validation.rs (semantic checks)
//!     → GatekeeperConfig (validated, immutable)
//!     → handed to the gatekeeper at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the allow-lists and prefix tables
//!   never change for the lifetime of the process
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load, ConfigError};
pub use schema::{
    ClientIpConfig, CorsConfig, GatekeeperConfig, HostConfig, ListenerConfig, Mode, ObservabilityConfig,
    RateLimitConfig, RoutesConfig, UpstreamConfig,
};
