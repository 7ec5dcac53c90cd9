use std::{fs, path::Path};

use crate::{ConfigError, FederateConfig};

impl FederateConfig {
    /// Parses and validates a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: FederateConfig = toml::from_str(source).map_err(|error| ConfigError::Parse {
            reason: error.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|error| ConfigError::Read {
            path: path.display().to_string(),
            reason: error.to_string(),
        })?;
        Self::from_toml_str(&source)
    }
}
