//! Metrics collection and exposition.
//!
//! # Metrics
//! - `signals_received_total` (counter): every dispatched signal, by name and class
//! - `signals_deadly_rejected_total` (counter): deadly signals swallowed by the gate
//! - `signals_unknown_total` (counter): numbers outside the capability table
//! - `swap_syncs_total` (counter): swap flushes, by reason

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::signals::SignalClass;

/// Start the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_signal(name: &'static str, class: SignalClass) {
    counter!("signals_received_total", "signal" => name, "class" => class.label()).increment(1);
    if class == SignalClass::Unknown {
        counter!("signals_unknown_total").increment(1);
    }
}

pub fn record_deadly_rejected(name: &'static str) {
    counter!("signals_deadly_rejected_total", "signal" => name).increment(1);
}

pub fn record_swap_sync(reason: &'static str, buffers: usize) {
    counter!("swap_syncs_total", "reason" => reason).increment(1);
    tracing::debug!(reason, buffers, "swap sync recorded");
}
