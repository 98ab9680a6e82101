//! Per-fault summaries from point observations.

use std::collections::HashMap;

use m2l_common::{EventId, Observation};
use m2l_geometry::stats::Centroid3;
use serde::{Deserialize, Serialize};

use super::DeformationRegistry;

/// Outcome of [`DeformationRegistry::summarise_data`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    /// Faults removed for having too few observations, in table order.
    pub pruned: Vec<EventId>,
    /// Faults whose centre was recomputed.
    pub summarised: usize,
    /// Observations whose id matches no fault.
    pub unmatched_observations: usize,
    /// Observations dropped for non-finite coordinates.
    pub rejected_observations: usize,
}

impl DeformationRegistry {
    /// Prune under-observed faults, then centre the rest on the mean of their
    /// observations.
    ///
    /// A fault needs at least `min_observations` (config) finite observations
    /// to survive. Pruning finishes before any centre is written.
    pub fn summarise_data(&mut self, observations: &[Observation]) -> SummaryReport {
        let mut report = SummaryReport::default();

        let mut centroids: HashMap<EventId, Centroid3> = HashMap::new();
        for obs in observations {
            if !(obs.x.is_finite() && obs.y.is_finite() && obs.z.is_finite()) {
                report.rejected_observations += 1;
                continue;
            }
            if !self.faults.contains_id(obs.id) {
                report.unmatched_observations += 1;
                continue;
            }
            centroids
                .entry(obs.id)
                .or_default()
                .push(obs.x, obs.y, obs.z);
        }

        let min_observations = self.config().min_observations;
        let removed = self.faults_mut().remove_where(|fault| {
            centroids
                .get(&fault.event_id)
                .map_or(0, Centroid3::count)
                < min_observations
        });
        for fault in &removed {
            tracing::debug!(
                fault = %fault.name,
                event_id = %fault.event_id,
                observations = centroids.get(&fault.event_id).map_or(0, Centroid3::count),
                "pruning fault with insufficient observations"
            );
        }
        report.pruned = removed.iter().map(|f| f.event_id).collect();

        let mut summarised = 0;
        self.faults_mut().update_each(|fault| {
            if let Some(centre) = centroids.get(&fault.event_id).and_then(Centroid3::mean) {
                fault.set_centre(centre);
                summarised += 1;
            }
        });
        report.summarised = summarised;

        if report.rejected_observations > 0 {
            tracing::warn!(
                rejected = report.rejected_observations,
                "ignored observations with non-finite coordinates"
            );
        }
        tracing::info!(
            observations = observations.len(),
            summarised = report.summarised,
            pruned = report.pruned.len(),
            unmatched = report.unmatched_observations,
            "summarised fault observations"
        );
        report
    }
}
