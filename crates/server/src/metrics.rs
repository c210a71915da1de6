//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the Orator server:
//! - HTTP request metrics (latency, counts, in flight)
//! - Ticket and analysis gauges (collected dynamically)
//! - Progress engine state (collected dynamically)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

use crate::state::AppState;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "orator_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("orator_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "orator_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Ticket Metrics (collected dynamically)
// =============================================================================

/// Live tickets.
pub static TICKETS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("orator_tickets_active", "Number of live tickets").unwrap()
});

/// Pending analyses across all tickets.
pub static ANALYSES_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "orator_analyses_in_flight",
        "Number of requested analyses not yet completed",
    )
    .unwrap()
});

// =============================================================================
// Engine Metrics (collected dynamically)
// =============================================================================

/// Progress engine running state (1 = running, 0 = stopped).
pub static ENGINE_RUNNING: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "orator_engine_running",
        "Whether the progress engine is running (1) or stopped (0)",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Tickets
    registry
        .register(Box::new(TICKETS_ACTIVE.clone()))
        .unwrap();
    registry
        .register(Box::new(ANALYSES_IN_FLIGHT.clone()))
        .unwrap();

    // Engine
    registry
        .register(Box::new(ENGINE_RUNNING.clone()))
        .unwrap();

    // Core metrics (tickets, analyses, ticks)
    for metric in orator_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding so the gauges reflect the store and engine at
/// scrape time.
pub fn collect_dynamic_metrics(state: &AppState) {
    let status = state.engine().status();
    ENGINE_RUNNING.set(if status.running { 1 } else { 0 });
    TICKETS_ACTIVE.set(status.tickets as i64);
    ANALYSES_IN_FLIGHT.set(status.in_flight as i64);
}

/// Normalize a path for metric labels.
///
/// Ticket ids travel in the query string, so the path alone is already
/// low-cardinality. Anything outside the known API surface collapses to one
/// label.
pub fn normalize_path(path: &str) -> String {
    const KNOWN: &[&str] = &[
        "/api/ticket/new",
        "/api/ticket/video",
        "/api/ticket/analyze",
        "/api/ticket/status",
        "/api/ticket/cancel",
        "/api/ticket/delete",
        "/api/analyses",
        "/api/engine",
        "/api/health",
        "/metrics",
    ];

    let trimmed = path.trim_end_matches('/');
    match KNOWN.iter().find(|known| **known == trimmed) {
        Some(known) => known.to_string(),
        None => "other".to_string(),
    }
}
