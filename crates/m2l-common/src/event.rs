//! Relationships between events and the relative chronology.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::id::EventId;
use crate::record::TableKind;

/// Ordered pair of fault ids, e.g. "`first` abuts `second`".
///
/// Stored append-only; cycles are not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Relationship {
    pub first: EventId,
    pub second: EventId,
}

impl Relationship {
    pub fn new(first: impl Into<EventId>, second: impl Into<EventId>) -> Self {
        Relationship {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Whether `id` takes part in this relationship.
    pub fn involves(&self, id: EventId) -> bool {
        self.first == id || self.second == id
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.first, self.second)
    }
}

/// One entry of the deformation history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEvent {
    pub table: TableKind,
    pub event_id: EventId,
    pub name: String,
}

impl HistoryEvent {
    pub fn fault(event_id: impl Into<EventId>, name: impl Into<String>) -> Self {
        HistoryEvent {
            table: TableKind::Faults,
            event_id: event_id.into(),
            name: name.into(),
        }
    }

    pub fn fold(event_id: impl Into<EventId>, name: impl Into<String>) -> Self {
        HistoryEvent {
            table: TableKind::Folds,
            event_id: event_id.into(),
            name: name.into(),
        }
    }
}
