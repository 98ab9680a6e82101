//! Rows handed to the registry by upstream map and observation loaders.

use m2l_geometry::Geometry;
use serde::{Deserialize, Serialize};

use crate::id::EventId;

/// One feature of the fault map layer.
///
/// Several features may share a `NAME`; they are dissolved into one fault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapFeature {
    #[serde(rename = "ID")]
    pub id: EventId,
    #[serde(rename = "NAME")]
    pub name: String,
    pub geometry: Geometry,
}

impl MapFeature {
    pub fn new(id: impl Into<EventId>, name: impl Into<String>, geometry: Geometry) -> Self {
        MapFeature {
            id: id.into(),
            name: name.into(),
            geometry,
        }
    }
}

/// A point observation on a fault, keyed by the fault's event id.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(rename = "ID")]
    pub id: EventId,
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
    #[serde(rename = "Z")]
    pub z: f64,
}

impl Observation {
    pub fn new(id: impl Into<EventId>, x: f64, y: f64, z: f64) -> Self {
        Observation {
            id: id.into(),
            x,
            y,
            z,
        }
    }
}
