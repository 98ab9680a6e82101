//! Property-based tests for the export view and population.

use m2l_common::{FaultRecord, MapFeature};
use m2l_core::DeformationRegistry;
use m2l_geometry::{BoundingBox, Geometry, Point2};
use proptest::prelude::*;

fn registry_with_lengths(lengths: &[f64]) -> DeformationRegistry {
    let mut registry = DeformationRegistry::new();
    for (i, &length) in lengths.iter().enumerate() {
        let mut fault = FaultRecord::new(i as i64, format!("F{i}")).unwrap();
        fault.length = length;
        registry.add_fault(fault).unwrap();
    }
    registry
}

// ============================================================================
// Export view
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn export_is_idempotent(
        lengths in prop::collection::vec(0.0f64..5000.0, 0..40),
        cutoff in -100.0f64..5000.0,
    ) {
        let mut registry = registry_with_lengths(&lengths);
        registry.set_minimum_fault_length(cutoff);
        let first = registry.faults_for_export();
        let second = registry.faults_for_export();
        prop_assert_eq!(first, second);
        prop_assert_eq!(registry.faults().len(), lengths.len());
    }

    #[test]
    fn raising_cutoff_never_adds_rows(
        lengths in prop::collection::vec(0.0f64..5000.0, 0..40),
        low in -100.0f64..5000.0,
        delta in 0.0f64..5000.0,
    ) {
        let mut registry = registry_with_lengths(&lengths);
        registry.set_minimum_fault_length(low);
        let at_low = registry.faults_for_export().len();
        registry.set_minimum_fault_length(low + delta);
        let at_high = registry.faults_for_export().len();
        prop_assert!(at_high <= at_low);
    }

    #[test]
    fn exported_rows_meet_cutoff(
        lengths in prop::collection::vec(0.0f64..5000.0, 0..40),
        cutoff in 0.0f64..5000.0,
    ) {
        let mut registry = registry_with_lengths(&lengths);
        registry.set_minimum_fault_length(cutoff);
        let exported = registry.faults_for_export();
        prop_assert!(exported.iter().all(|f| f.length >= cutoff));
        let expected = lengths.iter().filter(|&&l| l >= cutoff).count();
        prop_assert_eq!(exported.len(), expected);
    }
}

// ============================================================================
// Population
// ============================================================================

fn segment() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    (-1000.0f64..1000.0, -1000.0f64..1000.0, -1000.0f64..1000.0, -1000.0f64..1000.0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn one_row_per_name(
        segments in prop::collection::vec((0usize..5, segment()), 1..30),
    ) {
        let features: Vec<MapFeature> = segments
            .iter()
            .map(|&(n, (x0, y0, x1, y1))| {
                MapFeature::new(
                    n as i64,
                    format!("N{n}"),
                    Geometry::LineString(vec![Point2::new(x0, y0), Point2::new(x1, y1)]),
                )
            })
            .collect();

        let mut registry = DeformationRegistry::new();
        let report = registry.populate(&features);

        let mut names: Vec<_> = segments.iter().map(|&(n, _)| n).collect();
        names.sort_unstable();
        names.dedup();
        prop_assert!(report.is_clean());
        prop_assert_eq!(registry.faults().len(), names.len());

        for fault in registry.faults() {
            let total: f64 = features
                .iter()
                .filter(|f| f.name == fault.name)
                .map(|f| f.geometry.length())
                .sum();
            prop_assert!((fault.length - total).abs() <= 1e-6 * total.max(1.0));
            prop_assert!(fault.vertical_radius >= 0.0);
            prop_assert!((fault.horizontal_radius * 2.0 - fault.vertical_radius).abs() < 1e-9);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn ids_independent_of_names(
        segments in prop::collection::vec((0i64..5, 0usize..5, segment()), 1..30),
    ) {
        let features: Vec<MapFeature> = segments
            .iter()
            .map(|&(id, n, (x0, y0, x1, y1))| {
                MapFeature::new(
                    id,
                    format!("N{n}"),
                    Geometry::LineString(vec![Point2::new(x0, y0), Point2::new(x1, y1)]),
                )
            })
            .collect();

        let mut registry = DeformationRegistry::new();
        let report = registry.populate(&features);

        // Names are visited in order; each keeps its first fragment's id and
        // loses out if an earlier name already holds that id.
        let mut names: Vec<String> = features.iter().map(|f| f.name.clone()).collect();
        names.sort();
        names.dedup();
        let mut taken = Vec::new();
        let mut expected = Vec::new();
        for name in &names {
            let first = features.iter().find(|f| &f.name == name).unwrap();
            if !taken.contains(&first.id) {
                taken.push(first.id);
                expected.push((name.clone(), first.id));
            }
        }

        prop_assert_eq!(report.inserted + report.skipped.len(), names.len());
        prop_assert_eq!(report.inserted, expected.len());
        let actual: Vec<_> = registry
            .faults()
            .iter()
            .map(|f| (f.name.clone(), f.event_id))
            .collect();
        prop_assert_eq!(actual, expected);

        for fault in registry.faults() {
            let total: f64 = features
                .iter()
                .filter(|f| f.name == fault.name)
                .map(|f| f.geometry.length())
                .sum();
            prop_assert!((fault.length - total).abs() <= 1e-6 * total.max(1.0));

            let mut bounds = BoundingBox::void();
            for f in features.iter().filter(|f| f.id == fault.event_id) {
                bounds.merge(&f.geometry.bounds());
            }
            prop_assert!((fault.vertical_radius - bounds.diagonal()).abs() < 1e-9);
        }
    }
}
