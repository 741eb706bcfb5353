//! Edge request gatekeeper for the Active Back Office web application.
//!
//! Every inbound request is checked for transport and host policy, counted
//! against a per-client rate limit, classified by path, and stamped with a
//! fixed set of security headers before it reaches application handlers.

pub mod config;
pub mod error;
pub mod gatekeeper;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::GatekeeperConfig;
pub use gatekeeper::{Gatekeeper, RequestInfo, Verdict};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
