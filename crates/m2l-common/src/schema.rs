//! JSON schemas for the event tables.

use schemars::{schema_for, Schema};

use crate::event::{HistoryEvent, Relationship};
use crate::record::{FaultRecord, FoldRecord};

/// Version of the persisted table layout. Bump on any column change.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Schema of one fault row.
pub fn fault_record_schema() -> Schema {
    schema_for!(FaultRecord)
}

/// Schema of one fold row.
pub fn fold_record_schema() -> Schema {
    schema_for!(FoldRecord)
}

pub fn relationship_schema() -> Schema {
    schema_for!(Relationship)
}

pub fn history_event_schema() -> Schema {
    schema_for!(HistoryEvent)
}
