//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gatekeeper_decisions_total` (counter): verdicts by outcome
//! - `gatekeeper_rate_limited_total` (counter): 429s issued
//! - `gatekeeper_bot_requests_total` (counter): crawler user agents seen
//! - `gatekeeper_ledger_entries` (gauge): live rate-limit windows
//! - `gatekeeper_upstream_duration_seconds` (histogram): forwarding latency

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_decision(outcome: &'static str) {
    counter!("gatekeeper_decisions_total", "outcome" => outcome).increment(1);
}

pub fn record_rate_limited() {
    counter!("gatekeeper_rate_limited_total").increment(1);
}

pub fn record_bot() {
    counter!("gatekeeper_bot_requests_total").increment(1);
}

pub fn record_ledger_size(entries: usize) {
    gauge!("gatekeeper_ledger_entries").set(entries as f64);
}

pub fn record_upstream(status: u16, start: Instant) {
    histogram!(
        "gatekeeper_upstream_duration_seconds",
        "status" => status.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
