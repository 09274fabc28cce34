//! Config loading, validation, and registry lookups.

use super::model::{Config, ServerConfig};
use crate::error::{Result, VrocliError};
use serde::Deserialize;
use std::path::Path;

/// The file's top-level shape: everything sits under a `vrocli:` key so the
/// file can coexist with other tools' settings.
#[derive(Deserialize, Default)]
struct Document {
    #[serde(default)]
    vrocli: Config,
}

impl Config {
    /// Load config from a YAML file.
    ///
    /// A missing file is a user error with a pointer to what to create;
    /// everything the CLI does is scoped by this file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            VrocliError::UserError(format!(
                "failed to read configuration '{}': {}\n\
                 Create a {} file listing your packages and vro_servers.",
                path.display(),
                e,
                super::CONFIG_FILE,
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields are silently ignored for forward compatibility. An
    /// empty document means "all defaults".
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Config::default());
        }

        let document: Document = serde_yaml::from_str(yaml)
            .map_err(|e| VrocliError::UserError(format!("failed to parse configuration: {}", e)))?;

        let config = document.vrocli;
        config.validate()?;
        Ok(config)
    }

    /// Serialize config to a YAML string (document form, under `vrocli:`).
    pub fn to_yaml(&self) -> Result<String> {
        #[derive(serde::Serialize)]
        struct Out<'a> {
            vrocli: &'a Config,
        }
        serde_yaml::to_string(&Out { vrocli: self })
            .map_err(|e| VrocliError::UserError(format!("failed to serialize configuration: {}", e)))
    }

    /// Validate config values.
    pub fn validate(&self) -> Result<()> {
        for name in self.packages.keys() {
            if name.trim().is_empty() {
                return Err(VrocliError::UserError(
                    "config validation failed: package names must be non-empty".to_string(),
                ));
            }
        }
        for host in self.vro_servers.keys() {
            if host.trim().is_empty() {
                return Err(VrocliError::UserError(
                    "config validation failed: server hostnames must be non-empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Look up a configured server.
    pub fn server(&self, hostname: &str) -> Result<&ServerConfig> {
        self.vro_servers.get(hostname).ok_or_else(|| {
            VrocliError::UserError(format!(
                "vRO server '{}' is not configured. Add it under vro_servers in {} before using it.",
                hostname,
                super::CONFIG_FILE,
            ))
        })
    }
}
