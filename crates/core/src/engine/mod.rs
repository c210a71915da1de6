//! Progress engine.
//!
//! Simulates analysis work: every tick moves each in-flight analysis of a
//! ticket with video a fixed step closer to completion.

mod config;
mod runner;
mod types;

pub use config::EngineConfig;
pub use runner::ProgressEngine;
pub use types::{CompletedAnalysis, EngineStatus, TickReport};
