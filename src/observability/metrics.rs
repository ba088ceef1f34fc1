//! Metrics collection and exposition.
//!
//! # Metrics
//! - `mvc_dispatch_requests_total` (counter): requests by method, status, controller
//! - `mvc_dispatch_duration_seconds` (histogram): dispatch latency by controller
//! - `mvc_dispatch_route_misses_total` (counter): requests no route matched

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), metrics_exporter_prometheus::BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a finished request.
pub fn record_request(method: &str, status: u16, controller: &str, start: Instant) {
    metrics::counter!(
        "mvc_dispatch_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "controller" => controller.to_string()
    )
    .increment(1);
    metrics::histogram!("mvc_dispatch_duration_seconds", "controller" => controller.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record a request that matched no route.
pub fn record_route_miss(method: &str) {
    metrics::counter!("mvc_dispatch_route_misses_total", "method" => method.to_string())
        .increment(1);
}
