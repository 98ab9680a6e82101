//! Persisted registry state.
//!
//! The registry keeps nothing on disk by itself. A snapshot is the explicit
//! hand-off format: every table with its exact column names plus the export
//! cutoff in effect when it was taken.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use m2l_common::{
    Error, FaultRecord, FoldRecord, HistoryEvent, Relationship, Result, SCHEMA_VERSION,
};
use m2l_config::RegistryConfig;
use serde::{Deserialize, Serialize};

use super::DeformationRegistry;

/// Point-in-time copy of a registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub schema_version: String,

    pub created_at: DateTime<Utc>,

    /// Written as a number, or `"inf"` / `"-inf"` / `"NaN"` when not finite.
    #[serde(with = "non_finite_f64")]
    pub minimum_fault_length_to_export: f64,

    pub faults: Vec<FaultRecord>,

    pub folds: Vec<FoldRecord>,

    #[serde(default)]
    pub fault_fault_relationships: Vec<Relationship>,

    #[serde(default)]
    pub history: Vec<HistoryEvent>,
}

impl RegistrySnapshot {
    /// Checks the schema version.
    pub fn validate(&self) -> Result<()> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(Error::InvalidRecord(format!(
                "unsupported snapshot schema version {} (supported: {})",
                self.schema_version, SCHEMA_VERSION
            )));
        }
        Ok(())
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

/// JSON has no infinities, so non-finite values travel as labels.
mod non_finite_f64 {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Label(String),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_sign_positive() {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Label(label) => match label.to_ascii_lowercase().as_str() {
                "inf" | "+inf" | "infinity" => Ok(f64::INFINITY),
                "-inf" | "-infinity" => Ok(f64::NEG_INFINITY),
                "nan" => Ok(f64::NAN),
                _ => Err(D::Error::custom(format!("not a number: {label:?}"))),
            },
        }
    }
}

impl DeformationRegistry {
    /// Copy the current state.
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            schema_version: SCHEMA_VERSION.to_string(),
            created_at: Utc::now(),
            minimum_fault_length_to_export: self.minimum_fault_length_to_export,
            faults: self.faults.rows().to_vec(),
            folds: self.folds.rows().to_vec(),
            fault_fault_relationships: self.fault_fault_relationships.clone(),
            history: self.history.clone(),
        }
    }

    /// Rebuild a registry from a snapshot.
    ///
    /// Rows are re-inserted through the normal upsert path, so a snapshot
    /// that breaks the id/name invariants is rejected as a whole.
    pub fn from_snapshot(snapshot: RegistrySnapshot, config: &RegistryConfig) -> Result<Self> {
        snapshot.validate()?;

        let mut registry = DeformationRegistry::with_config(config);
        registry.minimum_fault_length_to_export = snapshot.minimum_fault_length_to_export;
        for fault in snapshot.faults {
            registry.faults.upsert(fault)?;
        }
        for fold in snapshot.folds {
            registry.folds.upsert(fold)?;
        }
        registry.fault_fault_relationships = snapshot.fault_fault_relationships;
        registry.history = snapshot.history;

        tracing::debug!(
            faults = registry.faults.len(),
            folds = registry.folds.len(),
            taken = %snapshot.created_at,
            "restored registry snapshot"
        );
        Ok(registry)
    }
}
