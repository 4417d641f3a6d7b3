//! Renderer configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dialect::{CapabilityOverrides, Dialect, DialectKind};
use crate::error::{RenderError, RenderResult};

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "sqlrender.toml";

/// Main renderer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Target dialect
    pub dialect: DialectKind,

    /// Capability flags overriding the dialect defaults
    pub capabilities: CapabilityOverrides,
}

impl RenderConfig {
    /// Create a new configuration builder
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder::default()
    }

    pub fn from_toml_str(content: &str) -> RenderResult<Self> {
        toml::from_str(content).map_err(|e| RenderError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> RenderResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)
            .map_err(|e| RenderError::Config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), dialect = %config.dialect, "Loaded configuration");
        Ok(config)
    }

    /// Candidate configuration files, most specific first.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("sqlrender").join("config.toml"));
        }
        paths
    }

    /// Load the explicit file if given, otherwise the first existing file
    /// from [`search_paths`](Self::search_paths), otherwise defaults.
    pub fn discover(explicit: Option<&Path>) -> RenderResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::search_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::load(&path),
            None => {
                tracing::debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Build the configured dialect.
    pub fn build_dialect(&self) -> Dialect {
        if self.capabilities.is_empty() {
            Dialect::new(self.dialect)
        } else {
            Dialect::with_overrides(self.dialect, &self.capabilities)
        }
    }
}

/// Builder for RenderConfig
#[derive(Debug, Default)]
pub struct RenderConfigBuilder {
    config: RenderConfig,
}

impl RenderConfigBuilder {
    /// Set the target dialect
    pub fn dialect(mut self, dialect: DialectKind) -> Self {
        self.config.dialect = dialect;
        self
    }

    /// Set the capability overrides
    pub fn capabilities(mut self, overrides: CapabilityOverrides) -> Self {
        self.config.capabilities = overrides;
        self
    }

    /// Build the configuration
    pub fn build(self) -> RenderConfig {
        self.config
    }
}
