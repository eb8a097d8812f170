//! Startup configuration assembly.
//!
//! Precedence, lowest first: built-in defaults, config file, overrides
//! (CLI flags and their environment variables). Validation runs last, on the
//! merged result.

use std::path::Path;

use crate::config::{read_config, validate_config, ConfigError, RelayConfig};

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub backend_origin: Option<String>,
    pub bind_address: Option<String>,
}

/// Produce the validated configuration the process will run with.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: Overrides,
) -> Result<RelayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => RelayConfig::default(),
    };

    if let Some(origin) = overrides.backend_origin {
        config.backend.origin = origin;
    }
    if let Some(bind) = overrides.bind_address {
        config.listener.bind_address = bind;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
