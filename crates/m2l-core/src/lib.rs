//! map2loop deformation registry core library.
//!
//! This library provides:
//! - The `DeformationRegistry` of fault and fold summaries
//! - Fault table population from map features
//! - Observation summarisation and export filtering
//! - Registry snapshots
//! - Structured logging setup

pub mod logging;
pub mod registry;

pub use registry::{
    config_error, DeformationRegistry, EventTable, Insertion, PopulateReport, RegistrySnapshot,
    SummaryReport,
};

/// Load the registry config from the standard locations and build an empty
/// registry from it.
pub fn registry_from_config(
    paths: m2l_config::ConfigPaths,
) -> m2l_common::Result<(DeformationRegistry, m2l_config::ConfigSnapshot)> {
    let (config, source) = m2l_config::resolve_config(paths).map_err(config_error)?;
    tracing::info!(
        source = %source.resolution,
        cutoff = config.minimum_fault_length_to_export,
        "loaded registry config"
    );
    let snapshot = m2l_config::ConfigSnapshot::new(&config, &source);
    Ok((DeformationRegistry::with_config(&config), snapshot))
}
