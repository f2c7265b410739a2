//! Metrics collection and exposition.
//!
//! # Metrics
//! - `catalog_api_requests_total` (counter): products API calls by operation, outcome
//! - `catalog_api_request_duration_seconds` (histogram): API latency by operation
//! - `catalog_page_renders_total` (counter): pages served by page, source
//! - `catalog_products` (gauge): size of the last list snapshot
//!
//! Recording is a no-op until an exporter is installed.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one call to the products API.
pub fn record_api_call(operation: &'static str, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "catalog_api_requests_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("catalog_api_request_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}

/// Record a served page and where its data came from (fresh, stale, generated).
pub fn record_page_render(page: &'static str, source: &'static str) {
    metrics::counter!("catalog_page_renders_total", "page" => page, "source" => source)
        .increment(1);
}

/// Record the size of the current product snapshot.
pub fn record_catalog_size(count: usize) {
    metrics::gauge!("catalog_products").set(count as f64);
}
