//! Deformation registry configuration loading and validation.
//!
//! This crate provides:
//! - The typed `RegistryConfig` (JSON or TOML on disk)
//! - Config resolution (explicit path → env → config dir → defaults)
//! - Semantic validation
//! - Config snapshots for reproducibility

pub mod registry;
pub mod resolve;
pub mod snapshot;
pub mod validate;

pub use registry::{ConfigFormat, RegistryConfig};
pub use resolve::{resolve_config, ConfigPaths, ConfigResolution, ConfigResolver, ConfigSource};
pub use snapshot::ConfigSnapshot;
pub use validate::{ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
