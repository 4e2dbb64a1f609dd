//! Engine configuration
//!
//! Loaded from TOML. Covers logging setup and the registry: which write policy
//! the built-in `NewPath` role uses, and any custom path roles.
//!
//! ```toml
//! [logging]
//! level = "pathrole_effects=debug,info"
//! json = false
//!
//! [registry]
//! write_policy = "strict"
//!
//! [[registry.roles]]
//! tag = "CacheDir"
//! operation = "read"
//! policy = "must_exist"
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::registry::EffectRegistry;
use crate::types::{ExistencePolicy, Operation, TypeTag};

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    /// Tracing subscriber settings
    pub logging: LoggingConfig,

    /// Registry contents
    pub registry: RegistryConfig,
}

/// Tracing subscriber settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. "info" or "pathrole_effects=debug,info"
    pub level: String,

    /// Emit JSON instead of human-readable output
    pub json: bool,
}

/// Registry settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Precondition for the built-in `NewPath` role
    pub write_policy: WritePolicy,

    /// Additional roles, registered after the built-ins
    pub roles: Vec<RoleConfig>,
}

/// How `NewPath` targets are checked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritePolicy {
    /// The target must not exist at call time
    #[default]
    Strict,
    /// The target's directory must exist; an existing target may be overwritten
    AllowOverwrite,
}

/// A custom path role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleConfig {
    pub tag: TypeTag,
    pub operation: Operation,
    pub policy: ExistencePolicy,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl EffectConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EffectConfig = toml::from_str(content).context("invalid effect configuration")?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Registry described by this configuration
    pub fn build_registry(&self) -> EffectRegistry {
        EffectRegistry::from_config(&self.registry)
    }

    /// Install the global tracing subscriber described by this configuration
    pub fn init_logging(&self) -> Result<()> {
        crate::logging::init_tracing(Some(&self.logging.level), Some(self.logging.json))
    }
}
