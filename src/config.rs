//! Device configuration.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Configuration for a capability device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DeviceConfig {
    /// Name of the namespace root the attribute set is published under.
    pub root_name: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            root_name: "hw_module".to_string(),
        }
    }
}

impl DeviceConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the attach path cannot use.
    pub fn validate(&self) -> Result<(), Error> {
        if self.root_name.is_empty() {
            return Err(Error::Config("root_name must not be empty".to_string()));
        }
        Ok(())
    }
}
