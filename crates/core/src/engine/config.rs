//! Progress engine configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the progress engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Enable/disable the background tick loop.
    /// When disabled, progress only moves when `tick()` is called directly.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// How often to advance in-flight analyses (milliseconds).
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,

    /// Progress added to every in-flight analysis per tick (0.0-1.0].
    #[serde(default = "default_progress_step")]
    pub progress_step: f64,
}

fn default_enabled() -> bool {
    true
}

fn default_tick_interval() -> u64 {
    100
}

fn default_progress_step() -> f64 {
    0.01
}

impl EngineConfig {
    /// Ticks needed to take an analysis from zero to completion.
    pub fn ticks_to_complete(&self) -> u64 {
        (1.0 / self.progress_step).ceil() as u64
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            tick_interval_ms: default_tick_interval(),
            progress_step: default_progress_step(),
        }
    }
}
