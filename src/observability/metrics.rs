//! Metrics collection and exposition.
//!
//! # Metrics
//! - `monitor_probes_total` (counter): probes by kind, status
//! - `monitor_probe_duration_ms` (histogram): probe latency by kind
//! - `monitor_service_up` (gauge): 1=UP, 0=DOWN, per service
//! - `monitor_skipped_total` (counter): services with no adapter, by kind
//! - `monitor_save_failures_total` (counter): results the sink rejected
//! - `monitor_cycles_total` (counter), `monitor_cycle_duration_seconds` (histogram)
//!
//! Recording without an installed exporter is a no-op.

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::model::{CheckKind, ProbeOutcome};

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_probe(kind: CheckKind, service_name: &str, outcome: &ProbeOutcome) {
    metrics::counter!(
        "monitor_probes_total",
        "kind" => kind.as_str(),
        "status" => outcome.status.as_str()
    )
    .increment(1);

    if let Some(ms) = outcome.response_time_ms {
        metrics::histogram!("monitor_probe_duration_ms", "kind" => kind.as_str()).record(ms as f64);
    }

    metrics::gauge!("monitor_service_up", "service" => service_name.to_string())
        .set(if outcome.is_up() { 1.0 } else { 0.0 });
}

pub fn record_skip(kind: CheckKind) {
    metrics::counter!("monitor_skipped_total", "kind" => kind.as_str()).increment(1);
}

pub fn record_save_failure() {
    metrics::counter!("monitor_save_failures_total").increment(1);
}

pub fn record_cycle(duration: Duration) {
    metrics::counter!("monitor_cycles_total").increment(1);
    metrics::histogram!("monitor_cycle_duration_seconds").record(duration.as_secs_f64());
}
