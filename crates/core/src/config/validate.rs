use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Upload limit is positive
/// - Engine tick interval is positive and progress step is in (0, 1]
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }
    if config.server.max_upload_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "server.max_upload_bytes cannot be 0".to_string(),
        ));
    }

    // Engine validation
    if config.engine.tick_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "engine.tick_interval_ms cannot be 0".to_string(),
        ));
    }
    let step = config.engine.progress_step;
    if !(step > 0.0 && step <= 1.0) {
        return Err(ConfigError::ValidationError(format!(
            "engine.progress_step must be in (0, 1], got {}",
            step
        )));
    }

    Ok(())
}
