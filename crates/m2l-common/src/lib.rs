//! Shared types for the map2loop deformation registry.
//!
//! This crate provides the vocabulary used across the workspace:
//! - Event identity types and lookup keys
//! - Fault and fold summary rows with their column contract
//! - Relationship and history entries
//! - Map feature and observation input rows
//! - The unified error type

pub mod error;
pub mod event;
pub mod id;
pub mod input;
pub mod record;
pub mod schema;

pub use error::{BatchError, Error, ErrorCategory, Result, StructuredError, SuggestedAction};
pub use event::{HistoryEvent, Relationship};
pub use id::{EventId, EventKey};
pub use input::{MapFeature, Observation};
pub use record::{EventRecord, FaultRecord, FoldRecord, TableKind};
pub use schema::SCHEMA_VERSION;
