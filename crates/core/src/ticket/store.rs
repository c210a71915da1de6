//! In-memory ticket registry.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info};

use super::status::{project_status, StatusView, TicketStatus};
use super::types::{Ticket, TicketId};
use crate::analysis::{AnalysisKind, Catalog};
use crate::metrics;

/// Error type for ticket operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TicketError {
    /// No ticket with this id.
    #[error("ticket not found: {0}")]
    UnknownTicket(String),

    /// The analysis kind is not in the catalog.
    #[error("unknown analysis kind: {0}")]
    UnknownAnalysisKind(String),

    /// The kind is already pending or completed on this ticket.
    #[error("analysis {kind} already requested for ticket {ticket_id}")]
    AlreadyRequested {
        ticket_id: String,
        kind: AnalysisKind,
    },

    /// The kind is neither pending nor completed on this ticket.
    #[error("analysis {kind} not requested for ticket {ticket_id}")]
    NotRequested {
        ticket_id: String,
        kind: AnalysisKind,
    },
}

/// What a successful analysis request queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOutcome {
    /// The kind the client asked for, or `None` for "everything".
    pub requested: Option<AnalysisKind>,
    /// Every kind newly queued by this request, in expansion order.
    pub added: Vec<AnalysisKind>,
}

impl RequestOutcome {
    /// Newly queued kinds other than the requested one.
    pub fn dependencies(&self) -> Vec<AnalysisKind> {
        self.added
            .iter()
            .copied()
            .filter(|kind| Some(*kind) != self.requested)
            .collect()
    }
}

type TicketHandle = Arc<Mutex<Ticket>>;

/// Owns every ticket and serializes operations per ticket.
///
/// The registry is a sharded map from id to a per-ticket mutex. Map shards are
/// locked only long enough to clone a handle; all reads and writes of a ticket
/// then happen under that ticket's own lock, so operations on one ticket are
/// linearized while different tickets proceed in parallel.
pub struct TicketStore {
    tickets: DashMap<TicketId, TicketHandle>,
    catalog: Arc<Catalog>,
}

impl TicketStore {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            tickets: DashMap::new(),
            catalog,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Allocate a new empty ticket.
    pub fn create(&self) -> TicketId {
        loop {
            let id = TicketId::generate();
            if let Entry::Vacant(slot) = self.tickets.entry(id.clone()) {
                slot.insert(Arc::new(Mutex::new(Ticket::new(id.clone()))));
                metrics::TICKETS_CREATED.inc();
                info!(ticket_id = %id, "Ticket created");
                return id;
            }
        }
    }

    /// Record that the ticket's video has been uploaded. Idempotent.
    pub fn mark_video_ready(&self, id: &str) -> Result<(), TicketError> {
        let handle = self.handle(id)?;
        let mut ticket = handle.lock();
        if !ticket.has_video {
            ticket.has_video = true;
            ticket.touch();
            info!(ticket_id = %id, "Video ready");
        }
        Ok(())
    }

    /// Remove a ticket and all of its state.
    pub fn delete(&self, id: &str) -> Result<(), TicketError> {
        match self.tickets.remove(id) {
            Some(_) => {
                metrics::TICKETS_DELETED.inc();
                info!(ticket_id = %id, "Ticket deleted");
                Ok(())
            }
            None => Err(TicketError::UnknownTicket(id.to_string())),
        }
    }

    /// Fail with `UnknownTicket` unless the ticket exists.
    pub fn ensure_exists(&self, id: &str) -> Result<(), TicketError> {
        self.handle(id).map(|_| ())
    }

    /// Queue `kind` and its dependencies, or every catalog kind if `None`.
    ///
    /// Kinds that are already pending or completed are left alone. A specific
    /// kind that is itself already pending or completed is rejected with
    /// `AlreadyRequested`; a request for everything never is.
    pub fn request_analysis(
        &self,
        id: &str,
        kind: Option<AnalysisKind>,
    ) -> Result<RequestOutcome, TicketError> {
        let handle = self.handle(id)?;

        // Expand before locking so a bad kind never touches ticket state
        let resolver = self.catalog.resolver();
        let expanded = match kind {
            Some(kind) => resolver
                .expand(kind)
                .map_err(|_| TicketError::UnknownAnalysisKind(kind.to_string()))?,
            None => resolver.expand_all(),
        };

        let mut ticket = handle.lock();
        if let Some(kind) = kind {
            if ticket.is_active(kind) {
                return Err(TicketError::AlreadyRequested {
                    ticket_id: id.to_string(),
                    kind,
                });
            }
        }

        let added: Vec<AnalysisKind> = expanded
            .into_iter()
            .filter(|k| ticket.enqueue(*k))
            .collect();
        if !added.is_empty() {
            ticket.touch();
        }
        drop(ticket);

        for k in &added {
            metrics::ANALYSES_REQUESTED
                .with_label_values(&[k.as_str()])
                .inc();
        }
        info!(
            ticket_id = %id,
            requested = kind.map_or("all", |k| k.as_str()),
            queued = added.len(),
            "Analysis requested"
        );

        Ok(RequestOutcome {
            requested: kind,
            added,
        })
    }

    /// Cancel `kind`, or every analysis of the ticket if `None`.
    ///
    /// Returns the kinds whose state was discarded. Cancelling one kind does
    /// not touch kinds that depend on it or that it depends on.
    pub fn cancel(
        &self,
        id: &str,
        kind: Option<AnalysisKind>,
    ) -> Result<Vec<AnalysisKind>, TicketError> {
        let handle = self.handle(id)?;
        let mut ticket = handle.lock();

        let removed = match kind {
            Some(kind) => {
                if !ticket.remove(kind) {
                    return Err(TicketError::NotRequested {
                        ticket_id: id.to_string(),
                        kind,
                    });
                }
                vec![kind]
            }
            None => ticket.clear(),
        };
        ticket.touch();
        drop(ticket);

        for k in &removed {
            metrics::ANALYSES_CANCELLED
                .with_label_values(&[k.as_str()])
                .inc();
        }
        info!(
            ticket_id = %id,
            cancelled = removed.len(),
            "Analysis cancelled"
        );
        Ok(removed)
    }

    /// Point-in-time copy of a ticket.
    pub fn snapshot(&self, id: &str) -> Result<Ticket, TicketError> {
        let handle = self.handle(id)?;
        let ticket = handle.lock();
        Ok(ticket.clone())
    }

    /// Status view of a ticket, with or without result payloads.
    pub fn status(&self, id: &str, view: StatusView) -> Result<TicketStatus, TicketError> {
        let handle = self.handle(id)?;
        let ticket = handle.lock();
        Ok(project_status(&ticket, view))
    }

    /// Number of live tickets.
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Ids of all live tickets, in no particular order.
    pub fn ids(&self) -> Vec<TicketId> {
        self.tickets.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Handles to every ticket, for sweeping without holding map locks.
    pub(crate) fn handles(&self) -> Vec<TicketHandle> {
        self.tickets
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    fn handle(&self, id: &str) -> Result<TicketHandle, TicketError> {
        match self.tickets.get(id) {
            Some(entry) => Ok(Arc::clone(entry.value())),
            None => {
                debug!(ticket_id = %id, "Ticket lookup missed");
                Err(TicketError::UnknownTicket(id.to_string()))
            }
        }
    }
}
