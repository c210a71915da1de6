//! Core ticket data types.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::analysis::AnalysisKind;

/// Opaque ticket identifier.
///
/// Rendered as 16 lowercase hex digits in four dash-separated groups, e.g.
/// `3f9a-01bc-7d24-e5f0`. Unguessable enough for a demo, not a secret.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        let bytes = Uuid::new_v4().into_bytes();
        let groups: Vec<String> = bytes[..8]
            .chunks(2)
            .map(|pair| format!("{:02x}{:02x}", pair[0], pair[1]))
            .collect();
        Self(groups.join("-"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TicketId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TicketId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Status of a requested analysis.
///
/// A kind that was never requested (or was cancelled) has no status at all;
/// absence is represented by a missing entry in [`Ticket::results`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AnalysisStatus {
    /// Work is running; `progress` is in `[0, 1)`.
    InProgress { progress: f64 },
    /// Work finished with this result.
    Completed { result: Value },
}

impl AnalysisStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, AnalysisStatus::Completed { .. })
    }

    /// Progress fraction, if still running.
    pub fn progress(&self) -> Option<f64> {
        match self {
            AnalysisStatus::InProgress { progress } => Some(*progress),
            AnalysisStatus::Completed { .. } => None,
        }
    }
}

/// One video-analysis session.
///
/// Invariant: every kind in `pending` has either no entry or an
/// `InProgress` entry in `results`, and no `Completed` kind is pending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set once the upload collaborator has delivered the video.
    pub has_video: bool,
    /// Requested but unfinished kinds, in request order, without duplicates.
    pub pending: Vec<AnalysisKind>,
    pub results: BTreeMap<AnalysisKind, AnalysisStatus>,
}

impl Ticket {
    pub fn new(id: TicketId) -> Self {
        let now = Utc::now();
        Self {
            id,
            created_at: now,
            updated_at: now,
            has_video: false,
            pending: Vec::new(),
            results: BTreeMap::new(),
        }
    }

    pub fn is_pending(&self, kind: AnalysisKind) -> bool {
        self.pending.contains(&kind)
    }

    pub fn is_completed(&self, kind: AnalysisKind) -> bool {
        self.results
            .get(&kind)
            .is_some_and(AnalysisStatus::is_completed)
    }

    /// Pending or completed: anything a request would collide with.
    pub fn is_active(&self, kind: AnalysisKind) -> bool {
        self.is_pending(kind) || self.is_completed(kind)
    }

    /// Progress of a running kind.
    pub fn progress(&self, kind: AnalysisKind) -> Option<f64> {
        self.results.get(&kind).and_then(AnalysisStatus::progress)
    }

    /// Queue `kind` with zero progress. Returns false if it was already active.
    pub(crate) fn enqueue(&mut self, kind: AnalysisKind) -> bool {
        if self.is_active(kind) {
            return false;
        }
        self.pending.push(kind);
        self.results
            .insert(kind, AnalysisStatus::InProgress { progress: 0.0 });
        true
    }

    /// Drop every trace of `kind`. Returns false if it was not active.
    pub(crate) fn remove(&mut self, kind: AnalysisKind) -> bool {
        let was_active = self.is_active(kind);
        self.pending.retain(|k| *k != kind);
        self.results.remove(&kind);
        was_active
    }

    /// Drop all requested analyses, returning the kinds that had any state.
    pub(crate) fn clear(&mut self) -> Vec<AnalysisKind> {
        let mut removed: Vec<AnalysisKind> = self.pending.drain(..).collect();
        for kind in std::mem::take(&mut self.results).into_keys() {
            if !removed.contains(&kind) {
                removed.push(kind);
            }
        }
        removed
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
