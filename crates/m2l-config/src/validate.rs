//! Configuration validation errors and semantic validation.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use crate::registry::RegistryConfig;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

fn colour_pattern() -> &'static Regex {
    static COLOUR: OnceLock<Regex> = OnceLock::new();
    COLOUR.get_or_init(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("colour pattern is valid"))
}

/// Validate registry configuration semantically.
///
/// The export cutoff only has to be finite: zero or negative values are
/// allowed and simply disable length filtering.
pub fn validate_registry_config(config: &RegistryConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    if !config.minimum_fault_length_to_export.is_finite() {
        return Err(ValidationError::InvalidValue {
            field: "minimum_fault_length_to_export".to_string(),
            message: format!("Must be finite, got {}", config.minimum_fault_length_to_export),
        });
    }

    if config.min_observations == 0 {
        return Err(ValidationError::InvalidValue {
            field: "min_observations".to_string(),
            message: "Must be at least 1".to_string(),
        });
    }

    if !config.default_displacement.is_finite() || config.default_displacement < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "default_displacement".to_string(),
            message: format!(
                "Must be finite and non-negative, got {}",
                config.default_displacement
            ),
        });
    }

    if !colour_pattern().is_match(&config.default_colour) {
        return Err(ValidationError::InvalidValue {
            field: "default_colour".to_string(),
            message: format!("Must look like #RRGGBB, got {:?}", config.default_colour),
        });
    }

    Ok(())
}
