//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_dispatch_total` (counter): dispatches by outcome
//! - `router_dispatch_duration_seconds` (histogram): lookup + handler latency
//! - `router_in_flight` (gauge): handlers currently admitted
//! - `router_routes_registered_total` (counter): successful registrations

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::error::RouterError;

/// Install the Prometheus recorder with an HTTP scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

/// Label for the outcome of a dispatch.
pub fn outcome_label(result: &Result<(), RouterError>) -> &'static str {
    match result {
        Ok(()) => "ok",
        Err(RouterError::RouteNotFound { .. }) => "not_found",
        Err(RouterError::Handler(_)) => "handler_error",
        Err(_) => "error",
    }
}

pub fn record_dispatch(outcome: &'static str, elapsed: Duration) {
    metrics::counter!("router_dispatch_total", "outcome" => outcome).increment(1);
    metrics::histogram!("router_dispatch_duration_seconds").record(elapsed.as_secs_f64());
}

pub fn record_in_flight(count: usize) {
    metrics::gauge!("router_in_flight").set(count as f64);
}

pub fn record_registration() {
    metrics::counter!("router_routes_registered_total").increment(1);
}
