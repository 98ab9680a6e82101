//! Configuration resolution.
//!
//! Resolution order:
//! 1. Explicit path (`ConfigPaths::config_path`)
//! 2. `M2L_REGISTRY_CONFIG` environment variable
//! 3. Config directory: explicit, `M2L_CONFIG_DIR`, `$XDG_CONFIG_HOME/map2loop`,
//!    then the platform config dir; `registry.json` wins over `registry.toml`
//! 4. Built-in defaults

use std::env;
use std::fs;
use std::path::PathBuf;

use sha2::{Digest, Sha256};

use crate::registry::{ConfigFormat, RegistryConfig};
use crate::validate::{ValidationError, ValidationResult};

/// Environment variable naming a config file.
pub const ENV_CONFIG_PATH: &str = "M2L_REGISTRY_CONFIG";

/// Environment variable naming a config directory.
pub const ENV_CONFIG_DIR: &str = "M2L_CONFIG_DIR";

const APP_DIR: &str = "map2loop";
const FILE_NAMES: [&str; 2] = ["registry.json", "registry.toml"];

/// Explicit configuration locations.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// Directory containing registry.json / registry.toml
    pub config_dir: Option<PathBuf>,
    /// Explicit path to a config file
    pub config_path: Option<PathBuf>,
}

/// How a config file was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigResolution {
    /// Explicit path from the caller
    Explicit,
    /// From environment variable
    EnvVar,
    /// From a config directory
    ConfigDir,
    /// Using built-in defaults
    Default,
}

impl std::fmt::Display for ConfigResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigResolution::Explicit => write!(f, "explicit"),
            ConfigResolution::EnvVar => write!(f, "env"),
            ConfigResolution::ConfigDir => write!(f, "config_dir"),
            ConfigResolution::Default => write!(f, "default"),
        }
    }
}

/// Where the loaded config came from.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    /// Path to the config file, or None if using defaults
    pub path: Option<String>,
    /// SHA-256 hash of file contents, or None if defaults
    pub hash: Option<String>,
    /// How this source was resolved
    pub resolution: ConfigResolution,
}

impl ConfigSource {
    pub fn defaults() -> Self {
        ConfigSource {
            path: None,
            hash: None,
            resolution: ConfigResolution::Default,
        }
    }
}

/// Resolve and load the registry config in one step.
pub fn resolve_config(paths: ConfigPaths) -> ValidationResult<(RegistryConfig, ConfigSource)> {
    ConfigResolver::new(paths).load()
}

/// Configuration resolver with deterministic resolution order.
#[derive(Debug, Default)]
pub struct ConfigResolver {
    paths: ConfigPaths,
}

impl ConfigResolver {
    pub fn new(paths: ConfigPaths) -> Self {
        ConfigResolver { paths }
    }

    /// Resolver with no explicit overrides.
    pub fn with_defaults() -> Self {
        ConfigResolver::default()
    }

    /// Resolve the config directory.
    pub fn resolve_config_dir(&self) -> Option<PathBuf> {
        if let Some(ref dir) = self.paths.config_dir {
            return Some(dir.clone());
        }

        if let Ok(dir) = env::var(ENV_CONFIG_DIR) {
            return Some(PathBuf::from(dir));
        }

        if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg).join(APP_DIR));
        }

        dirs::config_dir().map(|d| d.join(APP_DIR))
    }

    /// Resolve the config file path.
    pub fn resolve_config_path(&self) -> (Option<PathBuf>, ConfigResolution) {
        if let Some(ref path) = self.paths.config_path {
            return (Some(path.clone()), ConfigResolution::Explicit);
        }

        if let Ok(path) = env::var(ENV_CONFIG_PATH) {
            return (Some(PathBuf::from(path)), ConfigResolution::EnvVar);
        }

        if let Some(dir) = self.resolve_config_dir() {
            for name in FILE_NAMES {
                let path = dir.join(name);
                if path.exists() {
                    return (Some(path), ConfigResolution::ConfigDir);
                }
            }
        }

        (None, ConfigResolution::Default)
    }

    /// Load and validate the config from the resolved path, or defaults.
    pub fn load(&self) -> ValidationResult<(RegistryConfig, ConfigSource)> {
        let (path, resolution) = self.resolve_config_path();

        let Some(p) = path else {
            tracing::debug!("no registry config file found, using defaults");
            return Ok((RegistryConfig::default(), ConfigSource::defaults()));
        };

        let content = fs::read_to_string(&p).map_err(|e| {
            ValidationError::IoError(format!("failed to read {}: {}", p.display(), e))
        })?;
        let hash = compute_sha256(&content);

        let config = RegistryConfig::parse(&content, ConfigFormat::from_path(&p)).map_err(|e| {
            ValidationError::ParseError(format!("failed to parse {}: {}", p.display(), e))
        })?;
        config.validate()?;

        tracing::debug!(path = %p.display(), %resolution, "loaded registry config");

        Ok((
            config,
            ConfigSource {
                path: Some(p.to_string_lossy().to_string()),
                hash: Some(hash),
                resolution,
            },
        ))
    }
}

/// Compute SHA-256 hash of a string.
pub(crate) fn compute_sha256(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hash() {
        let hash = compute_sha256("minimum_fault_length_to_export = 1");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, compute_sha256("minimum_fault_length_to_export = 1"));
    }

    #[test]
    fn test_explicit_path_wins() {
        let resolver = ConfigResolver::new(ConfigPaths {
            config_dir: Some(PathBuf::from("/nonexistent/dir")),
            config_path: Some(PathBuf::from("/tmp/registry.json")),
        });
        let (path, resolution) = resolver.resolve_config_path();
        assert_eq!(path, Some(PathBuf::from("/tmp/registry.json")));
        assert_eq!(resolution, ConfigResolution::Explicit);
    }

    #[test]
    fn test_explicit_dir_is_used() {
        let resolver = ConfigResolver::new(ConfigPaths {
            config_dir: Some(PathBuf::from("/nonexistent/dir")),
            config_path: None,
        });
        assert_eq!(
            resolver.resolve_config_dir(),
            Some(PathBuf::from("/nonexistent/dir"))
        );
    }

    #[test]
    fn test_missing_explicit_file_is_io_error() {
        let resolver = ConfigResolver::new(ConfigPaths {
            config_dir: None,
            config_path: Some(PathBuf::from("/nonexistent/registry.json")),
        });
        let err = resolver.load().unwrap_err();
        assert!(matches!(err, ValidationError::IoError(_)));
    }

    #[test]
    fn test_resolution_display() {
        assert_eq!(ConfigResolution::Explicit.to_string(), "explicit");
        assert_eq!(ConfigResolution::Default.to_string(), "default");
    }
}
