//! Fault and fold summary rows.
//!
//! Field names serialize to the exact column names downstream consumers read
//! (`eventId`, `avgSlipDirX`, `influenceDistance`, ...). Any persistence
//! layer goes through these serde impls, so the column contract lives here.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::id::{json_kind, EventId};

/// Age value meaning "not known".
pub const UNKNOWN_AGE: f64 = -1.0;

/// Displacement assigned to freshly populated faults.
pub const DEFAULT_DISPLACEMENT: f64 = 1.0;

/// Display colour assigned to freshly populated faults.
pub const DEFAULT_COLOUR: &str = "#000000";

/// The two event tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    Faults,
    Folds,
}

impl TableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Faults => "faults",
            TableKind::Folds => "folds",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A row that can live in an event table.
pub trait EventRecord: Clone {
    /// Table this record type belongs to.
    const TABLE: TableKind;

    fn event_id(&self) -> EventId;

    fn name(&self) -> &str;

    /// Checks column invariants a table must not admit.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// One row of the fault summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FaultRecord {
    pub event_id: EventId,
    pub name: String,
    pub min_age: f64,
    pub max_age: f64,
    pub group: String,
    pub supergroup: String,
    pub avg_displacement: f64,
    pub avg_downthrow_dir: f64,
    /// Zone of influence around the trace; a quarter of the bounding diagonal
    /// when populated from geometry.
    pub influence_distance: f64,
    pub vertical_radius: f64,
    pub horizontal_radius: f64,
    pub colour: String,
    pub centre_x: f64,
    pub centre_y: f64,
    pub centre_z: f64,
    pub avg_slip_dir_x: f64,
    pub avg_slip_dir_y: f64,
    pub avg_slip_dir_z: f64,
    pub avg_normal_x: f64,
    pub avg_normal_y: f64,
    pub avg_normal_z: f64,
    /// Planform length in map units.
    pub length: f64,
}

impl Default for FaultRecord {
    fn default() -> Self {
        FaultRecord {
            event_id: EventId(0),
            name: String::new(),
            min_age: UNKNOWN_AGE,
            max_age: UNKNOWN_AGE,
            group: String::new(),
            supergroup: String::new(),
            avg_displacement: DEFAULT_DISPLACEMENT,
            avg_downthrow_dir: 0.0,
            influence_distance: 0.0,
            vertical_radius: 0.0,
            horizontal_radius: 0.0,
            colour: DEFAULT_COLOUR.to_string(),
            centre_x: 0.0,
            centre_y: 0.0,
            centre_z: 0.0,
            avg_slip_dir_x: 0.0,
            avg_slip_dir_y: 0.0,
            avg_slip_dir_z: 0.0,
            avg_normal_x: 0.0,
            avg_normal_y: 0.0,
            avg_normal_z: 0.0,
            length: 0.0,
        }
    }
}

impl FaultRecord {
    /// New fault with every derived column at its default.
    pub fn new(event_id: impl Into<EventId>, name: impl Into<String>) -> Result<Self> {
        let name = validated_name(TableKind::Faults, name.into())?;
        Ok(FaultRecord {
            event_id: event_id.into(),
            name,
            ..FaultRecord::default()
        })
    }

    /// Parses a loose column mapping. Missing optional columns take defaults.
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        parse_record(TableKind::Faults, value)
    }

    /// Sets the radii from a bounding diagonal: vertical = d, horizontal = d/2,
    /// influence = d/4.
    pub fn set_extent_from_diagonal(&mut self, diagonal: f64) {
        self.vertical_radius = diagonal;
        self.horizontal_radius = diagonal / 2.0;
        self.influence_distance = diagonal / 4.0;
    }

    pub fn centre(&self) -> [f64; 3] {
        [self.centre_x, self.centre_y, self.centre_z]
    }

    pub fn set_centre(&mut self, [x, y, z]: [f64; 3]) {
        self.centre_x = x;
        self.centre_y = y;
        self.centre_z = z;
    }
}

impl EventRecord for FaultRecord {
    const TABLE: TableKind = TableKind::Faults;

    fn event_id(&self) -> EventId {
        self.event_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    /// `length` must be finite and non-negative.
    fn validate(&self) -> Result<()> {
        if !self.length.is_finite() || self.length < 0.0 {
            return Err(Error::InvalidRecord(format!(
                "fault {:?} has length {}, expected a finite value >= 0",
                self.name, self.length
            )));
        }
        Ok(())
    }
}

/// One row of the fold summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FoldRecord {
    pub event_id: EventId,
    pub name: String,
    pub min_age: f64,
    pub max_age: f64,
    pub periodic: bool,
    pub wavelength: f64,
    pub amplitude: f64,
    pub asymmetry: bool,
    pub asymmetry_shift: f64,
    pub secondary_wavelength: f64,
    pub secondary_amplitude: f64,
}

impl Default for FoldRecord {
    fn default() -> Self {
        FoldRecord {
            event_id: EventId(0),
            name: String::new(),
            min_age: UNKNOWN_AGE,
            max_age: UNKNOWN_AGE,
            periodic: false,
            wavelength: 0.0,
            amplitude: 0.0,
            asymmetry: false,
            asymmetry_shift: 0.0,
            secondary_wavelength: 0.0,
            secondary_amplitude: 0.0,
        }
    }
}

impl FoldRecord {
    pub fn new(event_id: impl Into<EventId>, name: impl Into<String>) -> Result<Self> {
        let name = validated_name(TableKind::Folds, name.into())?;
        Ok(FoldRecord {
            event_id: event_id.into(),
            name,
            ..FoldRecord::default()
        })
    }

    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        parse_record(TableKind::Folds, value)
    }
}

impl EventRecord for FoldRecord {
    const TABLE: TableKind = TableKind::Folds;

    fn event_id(&self) -> EventId {
        self.event_id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn validated_name(table: TableKind, name: String) -> Result<String> {
    if name.trim().is_empty() {
        return Err(Error::MissingField {
            table,
            field: "name".to_string(),
        });
    }
    Ok(name)
}

/// Shared parser for loose record mappings.
///
/// `name` and `eventId` are the keys of a row and must be present; every
/// other column falls back to its default.
fn parse_record<T: DeserializeOwned>(table: TableKind, value: &serde_json::Value) -> Result<T> {
    let obj = value.as_object().ok_or_else(|| {
        Error::InvalidRecord(format!(
            "{} record must be an object, got {}",
            table,
            json_kind(value)
        ))
    })?;

    match obj.get("name") {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => {}
        Some(serde_json::Value::String(_)) | Some(serde_json::Value::Null) | None => {
            return Err(Error::MissingField {
                table,
                field: "name".to_string(),
            })
        }
        Some(other) => {
            return Err(Error::InvalidRecord(format!(
                "{} record `name` must be a string, got {}",
                table,
                json_kind(other)
            )))
        }
    }

    match obj.get("eventId") {
        Some(v) if v.is_i64() => {}
        None | Some(serde_json::Value::Null) => {
            return Err(Error::MissingField {
                table,
                field: "eventId".to_string(),
            })
        }
        Some(other) => {
            return Err(Error::InvalidRecord(format!(
                "{} record `eventId` must be an integer, got {}",
                table, other
            )))
        }
    }

    serde_json::from_value(value.clone())
        .map_err(|e| Error::InvalidRecord(format!("{} record: {}", table, e)))
}
