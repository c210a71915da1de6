//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Ticket lifecycle (created, deleted)
//! - Analyses (requested, completed, cancelled) by kind
//! - Progress engine ticks

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Ticket Metrics
// =============================================================================

/// Tickets created total.
pub static TICKETS_CREATED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("orator_tickets_created_total", "Total tickets created").unwrap()
});

/// Tickets deleted total.
pub static TICKETS_DELETED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("orator_tickets_deleted_total", "Total tickets deleted").unwrap()
});

// =============================================================================
// Analysis Metrics
// =============================================================================

/// Analyses queued total, including pulled-in dependencies.
pub static ANALYSES_REQUESTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "orator_analyses_requested_total",
            "Total analyses queued, including dependencies",
        ),
        &["kind"],
    )
    .unwrap()
});

/// Analyses completed total.
pub static ANALYSES_COMPLETED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("orator_analyses_completed_total", "Total analyses completed"),
        &["kind"],
    )
    .unwrap()
});

/// Analyses cancelled total.
pub static ANALYSES_CANCELLED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("orator_analyses_cancelled_total", "Total analyses cancelled"),
        &["kind"],
    )
    .unwrap()
});

// =============================================================================
// Progress Engine Metrics
// =============================================================================

/// Progress ticks total.
pub static PROGRESS_TICKS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("orator_progress_ticks_total", "Total progress engine ticks").unwrap()
});

/// Time spent sweeping all tickets in one tick.
pub static TICK_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "orator_tick_duration_seconds",
            "Duration of one progress engine sweep",
        )
        .buckets(vec![0.00001, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1]),
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Tickets
        Box::new(TICKETS_CREATED.clone()),
        Box::new(TICKETS_DELETED.clone()),
        // Analyses
        Box::new(ANALYSES_REQUESTED.clone()),
        Box::new(ANALYSES_COMPLETED.clone()),
        Box::new(ANALYSES_CANCELLED.clone()),
        // Engine
        Box::new(PROGRESS_TICKS.clone()),
        Box::new(TICK_DURATION.clone()),
    ]
}
