//! Metrics collection and exposition.
//!
//! # Metrics
//! - `edge_requests_total` (counter): requests by outcome
//! - `edge_request_duration_seconds` (histogram): handling latency by outcome
//!
//! Outcomes are `redirect`, `render` and `rejected`.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// How a request left the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Redirect,
    Render,
    Rejected,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Redirect => "redirect",
            Outcome::Render => "render",
            Outcome::Rejected => "rejected",
        }
    }
}

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one handled request.
pub fn record_request(outcome: Outcome, start: Instant) {
    let outcome = outcome.as_str();
    metrics::counter!("edge_requests_total", "outcome" => outcome).increment(1);
    metrics::histogram!("edge_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}
