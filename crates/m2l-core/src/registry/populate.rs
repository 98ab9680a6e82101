//! Bulk population of the fault table from map features.

use std::collections::BTreeMap;

use m2l_common::{BatchError, Error, FaultRecord, MapFeature, Result, TableKind};
use m2l_geometry::{BoundingBox, Geometry};
use serde::{Deserialize, Serialize};

use super::{DeformationRegistry, EventTable};

/// Outcome of [`DeformationRegistry::populate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulateReport {
    /// Features read.
    pub features: usize,
    /// Fault rows written.
    pub inserted: usize,
    /// Features or dissolved faults left out, with the reason.
    pub skipped: Vec<BatchError>,
}

impl PopulateReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

impl DeformationRegistry {
    /// Rebuild the fault table from map features.
    ///
    /// Fragments sharing a name are dissolved into one fault that keeps the
    /// first fragment's id. Rows come out ordered by name. Invalid features
    /// are skipped and reported. An empty slice leaves the table alone.
    pub fn populate(&mut self, features: &[MapFeature]) -> PopulateReport {
        let mut report = PopulateReport {
            features: features.len(),
            ..PopulateReport::default()
        };
        if features.is_empty() {
            return report;
        }

        let mut valid: Vec<&MapFeature> = Vec::with_capacity(features.len());
        for feature in features {
            match check_feature(feature) {
                Ok(()) => valid.push(feature),
                Err(e) => {
                    tracing::warn!(
                        feature = %feature.id,
                        name = %feature.name,
                        error = %e,
                        "skipping map feature"
                    );
                    report.skipped.push(BatchError::new(feature.id.to_string(), &e));
                }
            }
        }

        let mut by_name: BTreeMap<&str, Vec<&MapFeature>> = BTreeMap::new();
        for &feature in &valid {
            by_name.entry(feature.name.as_str()).or_default().push(feature);
        }

        let mut table = EventTable::new();
        for (name, fragments) in by_name {
            let fault = match self.dissolved_fault(name, &fragments, &valid) {
                Ok(fault) => fault,
                Err(e) => {
                    report.skipped.push(BatchError::new(name, &e));
                    continue;
                }
            };
            match table.upsert(fault) {
                Ok(_) => report.inserted += 1,
                Err(e) => {
                    tracing::warn!(fault = %name, error = %e, "skipping dissolved fault");
                    report.skipped.push(BatchError::new(name, &e));
                }
            }
        }

        self.replace_faults(table);
        tracing::info!(
            features = report.features,
            faults = report.inserted,
            skipped = report.skipped.len(),
            "populated fault table"
        );
        report
    }

    fn dissolved_fault(
        &self,
        name: &str,
        fragments: &[&MapFeature],
        all: &[&MapFeature],
    ) -> Result<FaultRecord> {
        let first = fragments
            .first()
            .ok_or_else(|| Error::InvalidRecord(format!("no fragments for fault {name}")))?;
        let event_id = first.id;

        let geometry = Geometry::dissolve(fragments.iter().map(|f| &f.geometry))
            .ok_or_else(|| Error::InvalidRecord(format!("no geometry for fault {name}")))?;

        // Extent covers the source fragments carrying the kept id, which may
        // include fragments filed under another name.
        let mut bounds = BoundingBox::void();
        for feature in all.iter().filter(|f| f.id == event_id) {
            bounds.merge(&feature.geometry.bounds());
        }

        let mut fault = FaultRecord::new(event_id, name)?;
        fault.avg_displacement = self.config().default_displacement;
        fault.colour = self.config().default_colour.clone();
        fault.length = geometry.length();
        fault.set_extent_from_diagonal(bounds.diagonal());

        if fragments.len() > 1 {
            tracing::debug!(
                fault = %name,
                %event_id,
                fragments = fragments.len(),
                parts = geometry.part_count(),
                "dissolved fault fragments"
            );
        }
        Ok(fault)
    }
}

fn check_feature(feature: &MapFeature) -> Result<()> {
    if feature.name.trim().is_empty() {
        return Err(Error::MissingField {
            table: TableKind::Faults,
            field: "NAME".to_string(),
        });
    }
    feature.geometry.validate()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use m2l_common::{ErrorCategory, EventId};
    use m2l_config::RegistryConfig;
    use m2l_geometry::Point2;

    fn line(points: &[(f64, f64)]) -> Geometry {
        Geometry::LineString(points.iter().map(|&p| Point2::from(p)).collect())
    }

    fn feature(id: i64, name: &str, points: &[(f64, f64)]) -> MapFeature {
        MapFeature::new(id, name, line(points))
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn single_feature_gets_defaults_and_extent() {
        let mut registry = DeformationRegistry::new();
        let report = registry.populate(&[feature(1, "F1", &[(0.0, 0.0), (4.0, 3.0)])]);

        assert!(report.is_clean());
        assert_eq!(report.inserted, 1);
        let f = &registry.faults()[0];
        assert_eq!(f.event_id, EventId(1));
        assert_eq!(f.min_age, -1.0);
        assert_eq!(f.max_age, -1.0);
        assert_eq!(f.avg_displacement, 1.0);
        assert_eq!(f.colour, "#000000");
        assert!(f.group.is_empty());
        assert!(approx_eq(f.length, 5.0));
        assert!(approx_eq(f.vertical_radius, 5.0));
        assert!(approx_eq(f.horizontal_radius, 2.5));
        assert!(approx_eq(f.influence_distance, 1.25));
    }

    #[test]
    fn fragments_dissolve_into_one_row() {
        let mut registry = DeformationRegistry::new();
        registry.populate(&[
            feature(1, "A", &[(0.0, 0.0), (1.0, 0.0)]),
            feature(1, "A", &[(2.0, 0.0), (3.0, 0.0)]),
        ]);

        assert_eq!(registry.faults().len(), 1);
        let f = &registry.faults()[0];
        assert_eq!(f.length, 2.0);
        assert_eq!(f.vertical_radius, 3.0);
    }

    #[test]
    fn dissolved_fault_keeps_first_fragment_id() {
        let mut registry = DeformationRegistry::new();
        registry.populate(&[
            feature(7, "A", &[(0.0, 0.0), (1.0, 0.0)]),
            feature(8, "A", &[(5.0, 0.0), (6.0, 0.0)]),
        ]);

        let f = &registry.faults()[0];
        assert_eq!(f.event_id, EventId(7));
        // Length covers both fragments, extent only those carrying id 7.
        assert_eq!(f.length, 2.0);
        assert_eq!(f.vertical_radius, 1.0);
        assert_eq!(f.horizontal_radius, 0.5);
    }

    #[test]
    fn extent_includes_other_names_with_same_id() {
        let mut registry = DeformationRegistry::new();
        let report = registry.populate(&[
            feature(1, "A", &[(0.0, 0.0), (1.0, 0.0)]),
            feature(1, "B", &[(0.0, 0.0), (0.0, 4.0)]),
        ]);

        // "B" collides on id 1 and is skipped, but its fragment still counts
        // towards the extent of id 1.
        assert_eq!(report.inserted, 1);
        let f = &registry.faults()[0];
        assert_eq!(f.name, "A");
        assert_eq!(f.length, 1.0);
        assert!(approx_eq(f.vertical_radius, 17f64.sqrt()));
    }

    #[test]
    fn rows_are_ordered_by_name() {
        let mut registry = DeformationRegistry::new();
        registry.populate(&[
            feature(1, "Zulu", &[(0.0, 0.0), (1.0, 0.0)]),
            feature(2, "Alpha", &[(0.0, 0.0), (1.0, 0.0)]),
            feature(3, "Mike", &[(0.0, 0.0), (1.0, 0.0)]),
        ]);
        let names: Vec<_> = registry.faults().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Mike", "Zulu"]);
    }

    #[test]
    fn polygon_length_is_perimeter() {
        let mut registry = DeformationRegistry::new();
        let square = Geometry::Polygon(
            [(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]
                .into_iter()
                .map(Point2::from)
                .collect(),
        );
        registry.populate(&[MapFeature::new(1, "Block", square)]);
        assert_eq!(registry.faults()[0].length, 8.0);
    }

    #[test]
    fn invalid_features_are_reported_not_inserted() {
        let mut registry = DeformationRegistry::new();
        let report = registry.populate(&[
            feature(1, "good", &[(0.0, 0.0), (1.0, 0.0)]),
            feature(2, "   ", &[(0.0, 0.0), (1.0, 0.0)]),
            feature(3, "nan", &[(0.0, 0.0), (f64::NAN, 0.0)]),
            MapFeature::new(4, "empty", Geometry::MultiLineString(vec![])),
        ]);

        assert_eq!(report.inserted, 1);
        assert_eq!(report.skipped.len(), 3);
        assert_eq!(report.skipped[0].item_id, "2");
        assert_eq!(report.skipped[0].error.category, ErrorCategory::Schema);
        assert_eq!(report.skipped[1].error.category, ErrorCategory::Geometry);
        assert_eq!(registry.faults().len(), 1);
        assert_eq!(registry.faults()[0].name, "good");
    }

    #[test]
    fn shared_id_across_names_is_duplicate() {
        let mut registry = DeformationRegistry::new();
        let report = registry.populate(&[
            feature(1, "A", &[(0.0, 0.0), (1.0, 0.0)]),
            feature(1, "B", &[(0.0, 0.0), (1.0, 0.0)]),
        ]);
        assert_eq!(report.inserted, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].item_id, "B");
        assert_eq!(report.skipped[0].error.code, 32);
    }

    #[test]
    fn populate_replaces_existing_rows() {
        let mut registry = DeformationRegistry::new();
        registry
            .add_fault(FaultRecord::new(99, "Old").unwrap())
            .unwrap();
        registry.populate(&[feature(1, "New", &[(0.0, 0.0), (1.0, 0.0)])]);
        assert_eq!(registry.faults().len(), 1);
        assert_eq!(registry.faults()[0].name, "New");
    }

    #[test]
    fn empty_input_is_noop() {
        let mut registry = DeformationRegistry::new();
        registry
            .add_fault(FaultRecord::new(1, "Kept").unwrap())
            .unwrap();
        let report = registry.populate(&[]);
        assert_eq!(report, PopulateReport::default());
        assert_eq!(registry.faults().len(), 1);
    }

    #[test]
    fn defaults_come_from_config() {
        let config = RegistryConfig {
            default_displacement: 250.0,
            default_colour: "#FF0000".to_string(),
            ..RegistryConfig::default()
        };
        let mut registry = DeformationRegistry::with_config(&config);
        registry.populate(&[feature(1, "F1", &[(0.0, 0.0), (1.0, 0.0)])]);
        assert_eq!(registry.faults()[0].avg_displacement, 250.0);
        assert_eq!(registry.faults()[0].colour, "#FF0000");
    }
}
