//! HTTP front end for the video analysis orchestrator.

pub mod api;
pub mod metrics;
pub mod state;
