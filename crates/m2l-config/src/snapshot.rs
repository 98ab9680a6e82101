//! Frozen record of the configuration a registry was built with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::registry::RegistryConfig;
use crate::resolve::{compute_sha256, ConfigSource};

/// Configuration state captured at load time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Schema version of the configuration.
    pub schema_version: String,

    /// Path the config was loaded from.
    #[serde(default)]
    pub path: Option<String>,

    /// How the config was resolved (explicit, env, config_dir, default).
    pub source: String,

    /// SHA-256 of the file content, or of the serialized defaults.
    pub hash: String,

    /// The effective values.
    pub config: RegistryConfig,
}

impl ConfigSnapshot {
    pub fn new(config: &RegistryConfig, source: &ConfigSource) -> Self {
        let hash = match &source.hash {
            Some(h) => h.clone(),
            None => compute_sha256(&serde_json::to_string(config).unwrap_or_default()),
        };

        ConfigSnapshot {
            timestamp: Utc::now(),
            schema_version: config.schema_version.clone(),
            path: source.path.clone(),
            source: source.resolution.to_string(),
            hash,
            config: config.clone(),
        }
    }

    /// Snapshot of the built-in defaults.
    pub fn from_defaults() -> Self {
        Self::new(&RegistryConfig::default(), &ConfigSource::defaults())
    }

    /// True if both snapshots describe the same effective configuration.
    pub fn same_config(&self, other: &ConfigSnapshot) -> bool {
        self.config == other.config
    }
}
