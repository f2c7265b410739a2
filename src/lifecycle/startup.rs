//! Startup orchestration.
//!
//! # Responsibilities
//! - Load configuration from a file, or fall back to defaults
//! - Apply command-line overrides
//! - Validate the result before anything binds
//!
//! Any startup error is fatal.

use std::path::Path;

use crate::config::loader::{load_config, ConfigError};
use crate::config::validation::validate_config;
use crate::config::CatalogConfig;

/// Command-line values that win over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind_address: Option<String>,
    pub api_base_url: Option<String>,
}

impl Overrides {
    fn apply(self, config: &mut CatalogConfig) {
        if let Some(bind) = self.bind_address {
            config.listener.bind_address = bind;
        }
        if let Some(url) = self.api_base_url {
            config.api.base_url = url;
        }
    }
}

/// Resolve the configuration the server starts with.
pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<CatalogConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => CatalogConfig::default(),
    };

    overrides.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        api = %config.api.base_url,
        fallback = ?config.generation.fallback,
        "Configuration loaded"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = load(None, Overrides::default()).unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
        assert_eq!(config.api.base_url, "https://api-products-server.herokuapp.com");
    }

    #[test]
    fn test_overrides_win() {
        let config = load(
            None,
            Overrides {
                bind_address: Some("127.0.0.1:4000".into()),
                api_base_url: Some("http://localhost:5000/v1".into()),
            },
        )
        .unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:4000");
        assert_eq!(config.api.base_url, "http://localhost:5000/v1");
    }

    #[test]
    fn test_bad_override_is_rejected() {
        let result = load(
            None,
            Overrides {
                bind_address: Some("nowhere".into()),
                api_base_url: None,
            },
        );
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
