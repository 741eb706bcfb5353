//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gatekeeper and server produce:
//!     → logging.rs (subscriber setup)
//!     → events.rs (security observations on the `security` target)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod events;
pub mod logging;
pub mod metrics;

pub use events::{Observer, SecurityEvent};
