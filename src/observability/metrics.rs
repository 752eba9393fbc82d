//! Metrics collection and exposition.
//!
//! # Metrics
//! - `blogchain_queries_total` (counter): REST queries by endpoint, outcome
//! - `blogchain_broadcasts_total` (counter): transactions by kind, outcome
//! - `blogchain_session_operations_total` (counter): store operations by name, outcome
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Prometheus exporter is opt-in via config

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_query(endpoint: &'static str, success: bool) {
    let outcome = if success { "ok" } else { "error" };
    metrics::counter!("blogchain_queries_total", "endpoint" => endpoint, "outcome" => outcome).increment(1);
}

pub fn record_broadcast(kind: &'static str, outcome: &'static str) {
    metrics::counter!("blogchain_broadcasts_total", "kind" => kind, "outcome" => outcome).increment(1);
}

pub fn record_session_operation(operation: &'static str, outcome: &'static str) {
    metrics::counter!(
        "blogchain_session_operations_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}
