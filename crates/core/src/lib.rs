//! Core library for the video analysis orchestrator.
//!
//! Tickets collect analysis requests against an uploaded video. Requests are
//! expanded through the analysis catalog's dependency graph, and the progress
//! engine moves every in-flight analysis toward a canned result.

pub mod analysis;
pub mod config;
pub mod engine;
pub mod metrics;
pub mod ticket;

pub use analysis::{
    payload_for, AnalysisKind, Catalog, CatalogEntry, CatalogError, DependencyResolver,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, ServerConfig,
};
pub use engine::{CompletedAnalysis, EngineConfig, EngineStatus, ProgressEngine, TickReport};
pub use ticket::{
    project_status, AnalysisStatus, Redacted, RequestOutcome, StatusEntry, StatusView, Ticket,
    TicketError, TicketId, TicketStatus, TicketStore,
};
