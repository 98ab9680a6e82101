//! Column names and loose-row parsing as seen by downstream consumers.

use m2l_common::schema::{fault_record_schema, history_event_schema};
use m2l_common::{
    Error, ErrorCategory, EventId, EventKey, FaultRecord, FoldRecord, HistoryEvent, MapFeature,
    Observation, TableKind,
};
use m2l_geometry::Geometry;
use serde_json::json;

#[test]
fn fault_row_serializes_with_table_columns() {
    let mut fault = FaultRecord::new(5, "Mt Bruce").unwrap();
    fault.influence_distance = 3.5;
    fault.avg_slip_dir_z = -1.0;

    let value = serde_json::to_value(&fault).unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.len(), 22);
    assert_eq!(value["eventId"], json!(5));
    assert_eq!(value["influenceDistance"], json!(3.5));
    assert_eq!(value["avgSlipDirZ"], json!(-1.0));
    assert_eq!(value["minAge"], json!(-1.0));
    assert_eq!(value["colour"], json!("#000000"));
}

#[test]
fn loose_fault_row_fills_defaults() {
    let fault = FaultRecord::from_value(&json!({
        "eventId": 9,
        "name": "F9",
        "group": "Hamersley",
        "length": 1200.0
    }))
    .unwrap();

    assert_eq!(fault.event_id, EventId(9));
    assert_eq!(fault.group, "Hamersley");
    assert_eq!(fault.length, 1200.0);
    assert_eq!(fault.avg_displacement, 1.0);
    assert_eq!(fault.max_age, -1.0);
}

#[test]
fn loose_rows_without_name_are_schema_errors() {
    for row in [
        json!({"eventId": 1}),
        json!({"eventId": 1, "name": null}),
        json!({"eventId": 1, "name": "  "}),
    ] {
        let err = FoldRecord::from_value(&row).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingField {
                table: TableKind::Folds,
                ..
            }
        ));
        assert_eq!(err.category(), ErrorCategory::Schema);
    }
}

#[test]
fn input_rows_use_upstream_column_names() {
    let feature: MapFeature = serde_json::from_value(json!({
        "ID": 3,
        "NAME": "F3",
        "geometry": {"type": "LineString", "coordinates": [{"x": 0.0, "y": 0.0}, {"x": 1.0, "y": 1.0}]}
    }))
    .unwrap();
    assert_eq!(feature.id, EventId(3));
    assert!(matches!(feature.geometry, Geometry::LineString(_)));

    let obs: Observation =
        serde_json::from_value(json!({"ID": 3, "X": 1.0, "Y": 2.0, "Z": -3.0})).unwrap();
    assert_eq!(obs, Observation::new(3, 1.0, 2.0, -3.0));
}

#[test]
fn lookup_keys_from_json() {
    assert_eq!(
        EventKey::try_from(&json!(4)).unwrap(),
        EventKey::Id(EventId(4))
    );
    assert_eq!(
        EventKey::try_from(&json!("F4")).unwrap(),
        EventKey::Name("F4".to_string())
    );
    let err = EventKey::try_from(&json!(false)).unwrap_err();
    assert_eq!(err.code(), 20);
}

#[test]
fn history_entries_name_their_table() {
    let value = serde_json::to_value(HistoryEvent::fold(2, "Fold B")).unwrap();
    assert_eq!(value, json!({"table": "folds", "eventId": 2, "name": "Fold B"}));
    assert!(history_event_schema().as_value()["properties"]["table"].is_object());
    assert!(fault_record_schema().as_value()["properties"]["eventId"].is_object());
}
