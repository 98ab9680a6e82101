//! The deformation event registry.
//!
//! Holds the fault and fold summaries, the fault-fault relationship list and
//! the relative chronology, and derives fault attributes from map geometry
//! ([`DeformationRegistry::populate`]) and point observations
//! ([`DeformationRegistry::summarise_data`]).
//!
//! Malformed input never aborts a batch: single-record calls return an
//! [`Error`], bulk calls report skipped items and keep going. Either way no
//! partial row reaches a table.

pub mod populate;
pub mod snapshot;
pub mod summarise;
pub mod table;

pub use populate::PopulateReport;
pub use snapshot::RegistrySnapshot;
pub use summarise::SummaryReport;
pub use table::{EventTable, Insertion};

use m2l_common::{
    Error, EventId, EventKey, FaultRecord, FoldRecord, HistoryEvent, Relationship, Result,
};
use m2l_config::RegistryConfig;

/// Fault and fold summaries plus their relationships and history.
#[derive(Debug, Clone)]
pub struct DeformationRegistry {
    config: RegistryConfig,
    minimum_fault_length_to_export: f64,
    faults: EventTable<FaultRecord>,
    folds: EventTable<FoldRecord>,
    fault_fault_relationships: Vec<Relationship>,
    history: Vec<HistoryEvent>,
}

impl Default for DeformationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DeformationRegistry {
    /// Empty registry with built-in defaults.
    pub fn new() -> Self {
        Self::with_config(&RegistryConfig::default())
    }

    /// Empty registry using `config` for defaults and thresholds.
    pub fn with_config(config: &RegistryConfig) -> Self {
        DeformationRegistry {
            config: config.clone(),
            minimum_fault_length_to_export: config.minimum_fault_length_to_export,
            faults: EventTable::new(),
            folds: EventTable::new(),
            fault_fault_relationships: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Export cutoff
    // ------------------------------------------------------------------

    /// Set the export length cutoff. Any value is accepted; zero or negative
    /// disables filtering.
    pub fn set_minimum_fault_length(&mut self, length: f64) {
        self.minimum_fault_length_to_export = length;
    }

    pub fn minimum_fault_length(&self) -> f64 {
        self.minimum_fault_length_to_export
    }

    // ------------------------------------------------------------------
    // Tables
    // ------------------------------------------------------------------

    pub fn faults(&self) -> &[FaultRecord] {
        self.faults.rows()
    }

    pub fn folds(&self) -> &[FoldRecord] {
        self.folds.rows()
    }

    pub fn fault_relationships(&self) -> &[Relationship] {
        &self.fault_fault_relationships
    }

    pub fn history(&self) -> &[HistoryEvent] {
        &self.history
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    pub fn find_fault_by_id(&self, id: EventId) -> Vec<&FaultRecord> {
        self.faults.get_by_id(id).into_iter().collect()
    }

    pub fn find_fault_by_name(&self, name: &str) -> Vec<&FaultRecord> {
        self.faults.get_by_name(name).into_iter().collect()
    }

    pub fn find_fault(&self, key: impl Into<EventKey>) -> Vec<&FaultRecord> {
        match key.into() {
            EventKey::Id(id) => self.find_fault_by_id(id),
            EventKey::Name(name) => self.find_fault_by_name(&name),
        }
    }

    /// Lookup with a loosely typed identifier (integer id or string name).
    pub fn find_fault_by_value(&self, key: &serde_json::Value) -> Result<Vec<&FaultRecord>> {
        let key = EventKey::try_from(key).inspect_err(|e| {
            tracing::warn!(error = %e, "cannot look up fault");
        })?;
        Ok(self.find_fault(key))
    }

    pub fn find_fold_by_id(&self, id: EventId) -> Vec<&FoldRecord> {
        self.folds.get_by_id(id).into_iter().collect()
    }

    pub fn find_fold_by_name(&self, name: &str) -> Vec<&FoldRecord> {
        self.folds.get_by_name(name).into_iter().collect()
    }

    pub fn find_fold(&self, key: impl Into<EventKey>) -> Vec<&FoldRecord> {
        match key.into() {
            EventKey::Id(id) => self.find_fold_by_id(id),
            EventKey::Name(name) => self.find_fold_by_name(&name),
        }
    }

    pub fn find_fold_by_value(&self, key: &serde_json::Value) -> Result<Vec<&FoldRecord>> {
        let key = EventKey::try_from(key).inspect_err(|e| {
            tracing::warn!(error = %e, "cannot look up fold");
        })?;
        Ok(self.find_fold(key))
    }

    // ------------------------------------------------------------------
    // Insertion and removal
    // ------------------------------------------------------------------

    /// Insert a fault, replacing any existing fault with the same name.
    pub fn add_fault(&mut self, fault: FaultRecord) -> Result<Insertion<FaultRecord>> {
        let name = fault.name.clone();
        let outcome = self.faults.upsert(fault).inspect_err(|e| {
            tracing::warn!(fault = %name, error = %e, "fault not added");
        })?;
        if outcome.is_replaced() {
            tracing::warn!(fault = %name, "replacing fault with the same name");
        }
        Ok(outcome)
    }

    /// Parse a loose column mapping and insert it as a fault.
    pub fn add_fault_value(&mut self, value: &serde_json::Value) -> Result<Insertion<FaultRecord>> {
        let fault = FaultRecord::from_value(value).inspect_err(|e| {
            tracing::warn!(error = %e, "rejected fault record");
        })?;
        self.add_fault(fault)
    }

    /// Insert a fold, replacing any existing fold with the same name.
    pub fn add_fold(&mut self, fold: FoldRecord) -> Result<Insertion<FoldRecord>> {
        let name = fold.name.clone();
        let outcome = self.folds.upsert(fold).inspect_err(|e| {
            tracing::warn!(fold = %name, error = %e, "fold not added");
        })?;
        if outcome.is_replaced() {
            tracing::warn!(fold = %name, "replacing fold with the same name");
        }
        Ok(outcome)
    }

    pub fn add_fold_value(&mut self, value: &serde_json::Value) -> Result<Insertion<FoldRecord>> {
        let fold = FoldRecord::from_value(value).inspect_err(|e| {
            tracing::warn!(error = %e, "rejected fold record");
        })?;
        self.add_fold(fold)
    }

    /// Remove every fault called `name`. Returns how many rows went.
    pub fn remove_fault_by_name(&mut self, name: &str) -> usize {
        let removed = self.faults.remove_by_name(name).len();
        tracing::debug!(fault = %name, removed, "remove fault by name");
        removed
    }

    pub fn remove_fault_by_event_id(&mut self, event_id: EventId) -> usize {
        let removed = self.faults.remove_by_id(event_id).len();
        tracing::debug!(%event_id, removed, "remove fault by event id");
        removed
    }

    pub fn remove_fold_by_name(&mut self, name: &str) -> usize {
        let removed = self.folds.remove_by_name(name).len();
        tracing::debug!(fold = %name, removed, "remove fold by name");
        removed
    }

    pub fn remove_fold_by_event_id(&mut self, event_id: EventId) -> usize {
        let removed = self.folds.remove_by_id(event_id).len();
        tracing::debug!(%event_id, removed, "remove fold by event id");
        removed
    }

    // ------------------------------------------------------------------
    // Relationships and history
    // ------------------------------------------------------------------

    /// Append a fault-fault relationship. Order is preserved; no cycle checks.
    pub fn add_fault_relationship(&mut self, first: impl Into<EventId>, second: impl Into<EventId>) {
        self.fault_fault_relationships
            .push(Relationship::new(first, second));
    }

    /// Append an event to the chronology (youngest last).
    pub fn push_history(&mut self, event: HistoryEvent) {
        self.history.push(event);
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Faults at least as long as the cutoff, copied in table order.
    pub fn faults_for_export(&self) -> Vec<FaultRecord> {
        let cutoff = self.minimum_fault_length_to_export;
        self.faults
            .iter()
            .filter(|f| f.length >= cutoff)
            .cloned()
            .collect()
    }

    fn replace_faults(&mut self, faults: EventTable<FaultRecord>) {
        self.faults = faults;
    }

    fn faults_mut(&mut self) -> &mut EventTable<FaultRecord> {
        &mut self.faults
    }
}

/// Maps a config validation failure onto the registry error type.
pub fn config_error(err: m2l_config::ValidationError) -> Error {
    Error::InvalidConfig(err.to_string())
}
