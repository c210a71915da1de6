//! Client-facing projection of a ticket's analysis state.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::types::{AnalysisStatus, Ticket};
use crate::analysis::AnalysisKind;

/// Placeholder for a completed result in a redacted view. Serializes as `{}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Redacted {}

/// One entry of a status view.
///
/// On the wire this is untagged: a number while running, the result object
/// once complete, or `{}` when the result is withheld.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatusEntry {
    Progress(f64),
    Completed(Value),
    Redacted(Redacted),
}

impl StatusEntry {
    pub fn is_finished(&self) -> bool {
        !matches!(self, StatusEntry::Progress(_))
    }
}

/// Which form of the status to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusView {
    /// Include result payloads.
    Full,
    /// Collapse result payloads to an empty marker.
    Redacted,
}

impl StatusView {
    pub fn from_full(full: bool) -> Self {
        if full {
            StatusView::Full
        } else {
            StatusView::Redacted
        }
    }
}

/// Status of every requested analysis of a ticket, keyed by kind.
pub type TicketStatus = BTreeMap<AnalysisKind, StatusEntry>;

/// Render `ticket` for a client. Kinds that were never requested are omitted.
pub fn project_status(ticket: &Ticket, view: StatusView) -> TicketStatus {
    ticket
        .results
        .iter()
        .map(|(kind, status)| {
            let entry = match (status, view) {
                (AnalysisStatus::InProgress { progress }, _) => StatusEntry::Progress(*progress),
                (AnalysisStatus::Completed { result }, StatusView::Full) => {
                    StatusEntry::Completed(result.clone())
                }
                (AnalysisStatus::Completed { .. }, StatusView::Redacted) => {
                    StatusEntry::Redacted(Redacted {})
                }
            };
            (*kind, entry)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::TicketId;
    use serde_json::json;

    fn sample_ticket() -> Ticket {
        let mut ticket = Ticket::new(TicketId::generate());
        ticket.pending.push(AnalysisKind::Metrics);
        ticket.results.insert(
            AnalysisKind::Metrics,
            AnalysisStatus::InProgress { progress: 0.42 },
        );
        ticket.results.insert(
            AnalysisKind::Transcription,
            AnalysisStatus::Completed {
                result: json!({ "text": "hello" }),
            },
        );
        ticket
    }

    #[test]
    fn test_full_view_includes_results() {
        let status = project_status(&sample_ticket(), StatusView::Full);
        assert_eq!(status.len(), 2);
        assert_eq!(status[&AnalysisKind::Metrics], StatusEntry::Progress(0.42));
        assert_eq!(
            status[&AnalysisKind::Transcription],
            StatusEntry::Completed(json!({ "text": "hello" }))
        );
    }

    #[test]
    fn test_redacted_view_hides_results() {
        let status = project_status(&sample_ticket(), StatusView::Redacted);
        assert_eq!(status[&AnalysisKind::Metrics], StatusEntry::Progress(0.42));
        assert_eq!(
            status[&AnalysisKind::Transcription],
            StatusEntry::Redacted(Redacted {})
        );
        assert!(status[&AnalysisKind::Transcription].is_finished());
    }

    #[test]
    fn test_wire_format() {
        let ticket = sample_ticket();

        let full = serde_json::to_value(project_status(&ticket, StatusView::Full)).unwrap();
        assert_eq!(
            full,
            json!({ "metrics": 0.42, "transcription": { "text": "hello" } })
        );

        let redacted =
            serde_json::to_value(project_status(&ticket, StatusView::Redacted)).unwrap();
        assert_eq!(redacted, json!({ "metrics": 0.42, "transcription": {} }));
    }

    #[test]
    fn test_never_requested_kinds_omitted() {
        let ticket = Ticket::new(TicketId::generate());
        assert!(project_status(&ticket, StatusView::Full).is_empty());
        assert!(project_status(&ticket, StatusView::Redacted).is_empty());
    }

    #[test]
    fn test_view_from_flag() {
        assert_eq!(StatusView::from_full(true), StatusView::Full);
        assert_eq!(StatusView::from_full(false), StatusView::Redacted);
    }
}
