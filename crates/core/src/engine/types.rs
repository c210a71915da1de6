//! Types for the progress engine.

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisKind;
use crate::ticket::TicketId;

/// An analysis that finished during a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedAnalysis {
    pub ticket_id: TicketId,
    pub kind: AnalysisKind,
}

/// What one sweep over all tickets did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Tickets with video whose pending work was visited.
    pub tickets_advanced: usize,
    /// Tickets with pending work skipped because no video has arrived.
    pub tickets_frozen: usize,
    /// Analyses whose progress moved without completing.
    pub progressed: usize,
    /// Analyses that completed on this tick.
    pub completed: Vec<CompletedAnalysis>,
}

/// Current status of the progress engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineStatus {
    /// Whether the tick loop is running.
    pub running: bool,
    /// Live tickets.
    pub tickets: usize,
    /// Tickets with pending work but no video yet.
    pub frozen_tickets: usize,
    /// Pending analyses across all tickets.
    pub in_flight: usize,
}
