//! Security policy building blocks.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → transport.rs (https enforcement, host allow-list)
//!     → rate_limit.rs (per-client fixed window)
//!     → bots.rs (crawler tagging)
//!     → routes.rs (setup bypass, API classification)
//!     → cors.rs (preflight answers)
//!     → headers.rs (security headers, cache suppression)
//! ```
//!
//! Each piece is independent and synchronous; the gatekeeper composes them
//! in a fixed order.

pub mod bots;
pub mod cors;
pub mod headers;
pub mod rate_limit;
pub mod routes;
pub mod transport;

pub use cors::CorsPolicy;
pub use rate_limit::{Clock, RateLimiter, SystemClock};

#[cfg(any(test, feature = "test-util"))]
pub use rate_limit::ManualClock;
pub use routes::{ApiRoute, RouteTable};
pub use transport::HostPolicy;
