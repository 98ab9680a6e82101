//! Typed registry configuration (registry.json / registry.toml).

use m2l_common::record::{DEFAULT_COLOUR, DEFAULT_DISPLACEMENT};
use serde::{Deserialize, Serialize};

use crate::validate::{validate_registry_config, ValidationResult};

/// Tunables for population, summarisation and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Schema version of this file.
    pub schema_version: String,

    /// Faults shorter than this (map units) are left out of the export view.
    pub minimum_fault_length_to_export: f64,

    /// Observations a fault needs to survive summarisation.
    pub min_observations: usize,

    /// `avgDisplacement` given to populated faults.
    pub default_displacement: f64,

    /// `colour` given to populated faults, `#RRGGBB`.
    pub default_colour: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            minimum_fault_length_to_export: 500.0,
            min_observations: 2,
            default_displacement: DEFAULT_DISPLACEMENT,
            default_colour: DEFAULT_COLOUR.to_string(),
        }
    }
}

impl RegistryConfig {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_registry_config(self)
    }

    /// Parse from file content, choosing TOML or JSON by the file extension.
    pub fn parse(content: &str, format: ConfigFormat) -> ValidationResult<Self> {
        match format {
            ConfigFormat::Json => serde_json::from_str(content)
                .map_err(|e| crate::ValidationError::ParseError(e.to_string())),
            ConfigFormat::Toml => {
                toml::from_str(content).map_err(|e| crate::ValidationError::ParseError(e.to_string()))
            }
        }
    }
}

/// On-disk format of a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// `.toml` files are TOML, everything else is JSON.
    pub fn from_path(path: &std::path::Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}
