//! Ticket system for tracking video analysis sessions.

mod status;
mod store;
mod types;

pub use status::{project_status, Redacted, StatusEntry, StatusView, TicketStatus};
pub use store::{RequestOutcome, TicketError, TicketStore};
pub use types::{AnalysisStatus, Ticket, TicketId};
