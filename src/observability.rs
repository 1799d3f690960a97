use std::net::SocketAddr;
use std::time::Instant;

use crate::sql::Command;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: total queries executed. Labels: command, status.
pub const QUERIES_TOTAL: &str = "settlement_queries_total";

/// Histogram: query latency in seconds. Labels: command.
pub const QUERY_DURATION_SECONDS: &str = "settlement_query_duration_seconds";

// ── Admission ───────────────────────────────────────────────────

/// Counter: bookings admitted.
pub const BOOKINGS_ACCEPTED_TOTAL: &str = "settlement_bookings_accepted_total";

/// Counter: bookings rejected on capacity.
pub const BOOKINGS_REJECTED_TOTAL: &str = "settlement_bookings_rejected_total";

/// Gauge: bookings currently held by the store.
pub const BOOKINGS_ACTIVE: &str = "settlement_bookings_active";

// ── USE metrics (resource utilization) ──────────────────────────

/// Gauge: active TCP connections.
pub const CONNECTIONS_ACTIVE: &str = "settlement_connections_active";

/// Counter: total connections accepted.
pub const CONNECTIONS_TOTAL: &str = "settlement_connections_total";

/// Counter: connections rejected due to limit.
pub const CONNECTIONS_REJECTED_TOTAL: &str = "settlement_connections_rejected_total";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}

/// Map a Command variant to a short label for metrics.
pub fn command_label(cmd: &Command) -> &'static str {
    match cmd {
        Command::InsertBooking { .. } => "insert_booking",
        Command::SelectBookings => "select_bookings",
    }
}

/// Publish the number of bookings held by the store.
pub fn set_active_bookings(count: usize) {
    metrics::gauge!(BOOKINGS_ACTIVE).set(count as f64);
}

/// Record outcome and latency of one executed query.
pub fn record_query(command: &'static str, ok: bool, started: Instant) {
    let status = if ok { "ok" } else { "error" };
    metrics::counter!(QUERIES_TOTAL, "command" => command, "status" => status).increment(1);
    metrics::histogram!(QUERY_DURATION_SECONDS, "command" => command)
        .record(started.elapsed().as_secs_f64());
}
