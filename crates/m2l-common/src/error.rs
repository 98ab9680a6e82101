//! Error types for the deformation registry.
//!
//! Every error carries:
//! - a stable numeric code for machine parsing
//! - a category for grouping
//! - a recoverability hint for batch pipelines
//! - a remediation message for humans
//!
//! Errors serialize to structured JSON through [`StructuredError`]:
//! ```json
//! {
//!   "code": 30,
//!   "category": "schema",
//!   "message": "faults record is missing required field `name`",
//!   "recoverable": true,
//!   "suggested_action": "fix_input",
//!   "context": { "table": "faults", "field": "name" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::id::EventId;
use crate::record::TableKind;

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration loading and validation.
    Config,
    /// Identifier of an unsupported type passed to a lookup.
    Type,
    /// Record shape errors: missing fields, key conflicts.
    Schema,
    /// Unusable map geometry.
    Geometry,
    /// File I/O and serialization.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Type => write!(f, "type"),
            ErrorCategory::Schema => write!(f, "schema"),
            ErrorCategory::Geometry => write!(f, "geometry"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// What a pipeline stage should do about an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    /// Skip the offending item and continue the batch.
    Skip,
    /// Correct the input data and rerun.
    FixInput,
    /// Reset configuration to defaults.
    ResetConfig,
    /// Retry the operation.
    Retry,
    /// Manual intervention required.
    ManualIntervention,
}

impl std::fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestedAction::Skip => write!(f, "skip"),
            SuggestedAction::FixInput => write!(f, "fix_input"),
            SuggestedAction::ResetConfig => write!(f, "reset_config"),
            SuggestedAction::Retry => write!(f, "retry"),
            SuggestedAction::ManualIntervention => write!(f, "manual_intervention"),
        }
    }
}

/// Unified error type for the registry.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("invalid registry configuration: {0}")]
    InvalidConfig(String),

    // Type errors (20-29)
    #[error("unsupported identifier type `{kind}`, expected an integer event id or a name")]
    UnsupportedIdentifier { kind: String },

    // Schema errors (30-39)
    #[error("{table} record is missing required field `{field}`")]
    MissingField { table: TableKind, field: String },

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("event id {event_id} is already used by another row in {table}")]
    DuplicateEventId { table: TableKind, event_id: EventId },

    // Geometry errors (40-49)
    #[error("invalid geometry: {0}")]
    InvalidGeometry(#[from] m2l_geometry::GeometryError),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the stable error code.
    ///
    /// - 10-19: configuration
    /// - 20-29: identifier types
    /// - 30-39: record schema
    /// - 40-49: geometry
    /// - 60-69: I/O
    pub fn code(&self) -> u32 {
        match self {
            Error::InvalidConfig(_) => 11,
            Error::UnsupportedIdentifier { .. } => 20,
            Error::MissingField { .. } => 30,
            Error::InvalidRecord(_) => 31,
            Error::DuplicateEventId { .. } => 32,
            Error::InvalidGeometry(_) => 40,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidConfig(_) => ErrorCategory::Config,
            Error::UnsupportedIdentifier { .. } => ErrorCategory::Type,
            Error::MissingField { .. } | Error::InvalidRecord(_) | Error::DuplicateEventId { .. } => {
                ErrorCategory::Schema
            }
            Error::InvalidGeometry(_) => ErrorCategory::Geometry,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Whether a batch may continue past this error.
    ///
    /// Input-level problems only affect the offending record.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::InvalidConfig(_) => false,
            Error::UnsupportedIdentifier { .. } => true,
            Error::MissingField { .. } => true,
            Error::InvalidRecord(_) => true,
            Error::DuplicateEventId { .. } => true,
            Error::InvalidGeometry(_) => true,
            Error::Io(_) => true,
            Error::Json(_) => false,
        }
    }

    /// Returns the suggested action for the calling pipeline.
    pub fn suggested_action(&self) -> SuggestedAction {
        match self {
            Error::InvalidConfig(_) => SuggestedAction::ResetConfig,
            Error::UnsupportedIdentifier { .. } => SuggestedAction::FixInput,
            Error::MissingField { .. } => SuggestedAction::FixInput,
            Error::InvalidRecord(_) => SuggestedAction::FixInput,
            Error::DuplicateEventId { .. } => SuggestedAction::Skip,
            Error::InvalidGeometry(_) => SuggestedAction::Skip,
            Error::Io(_) => SuggestedAction::Retry,
            Error::Json(_) => SuggestedAction::ManualIntervention,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::InvalidConfig(_) => {
                "Fix the reported field in registry.json, or delete the file to use defaults."
            }
            Error::UnsupportedIdentifier { .. } => {
                "Look events up by integer event id or by name."
            }
            Error::MissingField { .. } => "Add the missing column to the record before inserting.",
            Error::InvalidRecord(_) => {
                "Records must be objects whose columns match the fault or fold table schema."
            }
            Error::DuplicateEventId { .. } => {
                "Event ids must be unique per table. Remove the existing row or renumber the new one."
            }
            Error::InvalidGeometry(_) => {
                "Check the map layer for empty or corrupt features. The feature was skipped."
            }
            Error::Io(_) => "Check disk space, permissions, and that the path exists.",
            Error::Json(_) => "Invalid JSON. Check the file syntax or regenerate it.",
        }
    }
}

/// Structured error for JSON diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Suggested action for the caller.
    pub suggested_action: SuggestedAction,

    /// Remediation hint.
    pub hint: String,

    /// Additional structured context (table, event id, field).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::UnsupportedIdentifier { kind } => {
                context.insert("kind".to_string(), serde_json::json!(kind));
            }
            Error::MissingField { table, field } => {
                context.insert("table".to_string(), serde_json::json!(table.as_str()));
                context.insert("field".to_string(), serde_json::json!(field));
            }
            Error::DuplicateEventId { table, event_id } => {
                context.insert("table".to_string(), serde_json::json!(table.as_str()));
                context.insert("event_id".to_string(), serde_json::json!(event_id.0));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            suggested_action: err.suggested_action(),
            hint: err.remediation().to_string(),
            context,
        }
    }
}

impl StructuredError {
    /// Add additional context to the error.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}

/// An input item skipped by a batch operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchError {
    /// Identifier of the skipped item (feature id or name).
    pub item_id: String,

    /// Why it was skipped.
    pub error: StructuredError,
}

impl BatchError {
    pub fn new(item_id: impl Into<String>, error: &Error) -> Self {
        BatchError {
            item_id: item_id.into(),
            error: StructuredError::from(error),
        }
    }
}
