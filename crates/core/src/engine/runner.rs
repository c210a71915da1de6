//! Progress engine implementation.
//!
//! One periodic loop sweeps every ticket and advances in-flight analyses:
//! - Tickets without video are skipped (frozen, not failed)
//! - Each ticket is locked on its own while it is advanced
//! - Completed analyses get their result and leave the pending set

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::analysis::{payload_for, AnalysisKind};
use crate::metrics;
use crate::ticket::{AnalysisStatus, Ticket, TicketStore};

use super::config::EngineConfig;
use super::types::{CompletedAnalysis, EngineStatus, TickReport};

/// Slack for floating point accumulation when checking for completion.
const COMPLETION_EPSILON: f64 = 1e-9;

/// Outcome of advancing a single ticket.
#[derive(Debug, Default, PartialEq, Eq)]
struct TicketProgress {
    progressed: usize,
    completed: Vec<AnalysisKind>,
}

/// Advance every pending analysis of `ticket` by `step`.
///
/// Must be called with the ticket's lock held. Only kinds still in `pending`
/// are visited, so anything cancelled earlier is never brought back.
fn advance_ticket(ticket: &mut Ticket, step: f64) -> TicketProgress {
    let mut progress = TicketProgress::default();

    for kind in ticket.pending.clone() {
        let next = match ticket.results.get(&kind) {
            None => {
                ticket
                    .results
                    .insert(kind, AnalysisStatus::InProgress { progress: 0.0 });
                progress.progressed += 1;
                continue;
            }
            Some(AnalysisStatus::InProgress { progress: current }) => current + step,
            // Not reachable while the pending invariant holds
            Some(AnalysisStatus::Completed { .. }) => 1.0,
        };

        if next >= 1.0 - COMPLETION_EPSILON {
            ticket.results.insert(
                kind,
                AnalysisStatus::Completed {
                    result: payload_for(kind),
                },
            );
            progress.completed.push(kind);
        } else {
            ticket
                .results
                .insert(kind, AnalysisStatus::InProgress { progress: next });
            progress.progressed += 1;
        }
    }

    if !progress.completed.is_empty() {
        ticket.pending.retain(|k| !progress.completed.contains(k));
    }
    if progress.progressed > 0 || !progress.completed.is_empty() {
        ticket.touch();
    }
    progress
}

/// The progress engine - drives requested analyses toward completion.
pub struct ProgressEngine {
    config: EngineConfig,
    store: Arc<TicketStore>,

    // Runtime state
    running: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
}

impl ProgressEngine {
    /// Create a new engine over `store`.
    pub fn new(config: EngineConfig, store: Arc<TicketStore>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            config,
            store,
            running: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Sweep all tickets once.
    pub fn tick(&self) -> TickReport {
        sweep(&self.store, self.config.progress_step)
    }

    /// Start the engine (spawns the tick loop).
    pub fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Progress engine already running");
            return;
        }

        info!(
            "Starting progress engine (interval {}ms, step {})",
            self.config.tick_interval_ms, self.config.progress_step
        );
        self.spawn_tick_loop();
    }

    /// Stop the engine. The loop exits before its next tick.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            warn!("Progress engine not running");
            return;
        }

        info!("Stopping progress engine");
        let _ = self.shutdown_tx.send(());
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Get current engine status.
    pub fn status(&self) -> EngineStatus {
        let mut status = EngineStatus {
            running: self.is_running(),
            ..Default::default()
        };

        for handle in self.store.handles() {
            let ticket = handle.lock();
            status.tickets += 1;
            status.in_flight += ticket.pending.len();
            if !ticket.has_video && !ticket.pending.is_empty() {
                status.frozen_tickets += 1;
            }
        }
        status
    }

    fn spawn_tick_loop(&self) {
        let running = Arc::clone(&self.running);
        let store = Arc::clone(&self.store);
        let step = self.config.progress_step;
        let period = Duration::from_millis(self.config.tick_interval_ms);
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            info!("Tick loop started");
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("Tick loop received shutdown signal");
                        break;
                    }
                    _ = interval.tick() => {
                        if !running.load(Ordering::Relaxed) {
                            break;
                        }
                        sweep(&store, step);
                    }
                }
            }
            info!("Tick loop stopped");
        });
    }
}

fn sweep(store: &TicketStore, step: f64) -> TickReport {
    let started = Instant::now();
    let mut report = TickReport::default();

    for handle in store.handles() {
        let mut ticket = handle.lock();
        if ticket.pending.is_empty() {
            continue;
        }
        if !ticket.has_video {
            report.tickets_frozen += 1;
            continue;
        }

        let progress = advance_ticket(&mut ticket, step);
        let ticket_id = ticket.id.clone();
        drop(ticket);

        report.tickets_advanced += 1;
        report.progressed += progress.progressed;
        for kind in progress.completed {
            metrics::ANALYSES_COMPLETED
                .with_label_values(&[kind.as_str()])
                .inc();
            info!(ticket_id = %ticket_id, kind = %kind, "Analysis completed");
            report.completed.push(CompletedAnalysis {
                ticket_id: ticket_id.clone(),
                kind,
            });
        }
    }

    metrics::PROGRESS_TICKS.inc();
    metrics::TICK_DURATION.observe(started.elapsed().as_secs_f64());
    if report.tickets_advanced > 0 {
        debug!(
            advanced = report.tickets_advanced,
            frozen = report.tickets_frozen,
            progressed = report.progressed,
            completed = report.completed.len(),
            "Tick"
        );
    }
    report
}
