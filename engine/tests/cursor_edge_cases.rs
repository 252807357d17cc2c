//! Edge case tests for tabula-engine
//!
//! These tests cover cursor boundaries, schema quirks and the read-only surface.

use proptest::prelude::*;
use serde_json::json;
use tabula_engine::{
    records_from_json, AdvancedType, Config, Cursor, Error, FieldValue, Record, Statement,
    StatementHandle, ValueType,
};

fn records(value: serde_json::Value) -> Vec<Record> {
    records_from_json(value, &Config::default()).unwrap()
}

fn open(value: serde_json::Value) -> Cursor {
    Cursor::new(records(value), StatementHandle::new())
}

fn wrapped(i: usize) -> serde_json::Value {
    json!({
        "id": format!("rec{}", i),
        "createdTime": "2024-05-01T08:00:00.000Z",
        "fields": {"A": format!("a{}", i), "B": i, "C": i % 2 == 0}
    })
}

// ============================================================================
// Schema Discovery
// ============================================================================

#[test]
fn wrapper_key_never_becomes_a_column() {
    let cursor = open(json!([wrapped(0), wrapped(1)]));
    let meta = cursor.metadata();

    let names: Vec<_> = meta.columns().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "createdTime", "A", "B", "C"]);
    assert!(cursor.find_column("fields").is_err());
    assert_eq!(meta.column_type(4).unwrap(), ValueType::Integer);
}

#[test]
fn fields_missing_from_first_record_are_never_columns() {
    let mut cursor = open(json!([
        {"id": "rec1", "fields": {"A": 1}},
        {"id": "rec2", "fields": {"A": 2, "Late": "x"}}
    ]));

    assert_eq!(cursor.metadata().column_count(), 2);
    assert!(matches!(cursor.find_column("Late"), Err(Error::NoSuchColumn(_))));

    // Still reachable by name: the lookup goes to the record, not the schema.
    cursor.advance();
    cursor.advance();
    assert_eq!(
        cursor.get_value("Late").unwrap(),
        Some(&FieldValue::Text("x".into()))
    );
}

#[test]
fn schema_types_come_from_first_record_only() {
    let mut cursor = open(json!([
        {"fields": {"X": null}},
        {"fields": {"X": 5}}
    ]));

    assert_eq!(cursor.metadata().column_type(1).unwrap(), ValueType::Unknown);

    cursor.advance();
    assert_eq!(cursor.get_value(1).unwrap(), Some(&FieldValue::Null));
    assert!(cursor.was_null());

    cursor.advance();
    assert_eq!(cursor.get_long(1).unwrap(), 5);
    assert!(!cursor.was_null());
}

#[test]
fn deep_wrapper_chains_are_bounded() {
    let mut value = json!({"leaf": 1});
    for _ in 0..20 {
        value = json!({ "fields": value });
    }
    let config = Config::default().with_max_depth(3);
    let cursor = Cursor::with_config(
        records_from_json(json!([value]), &config).unwrap(),
        StatementHandle::new(),
        config,
    );

    assert_eq!(cursor.metadata().column_count(), 1);
    assert_eq!(cursor.metadata().column_name(1).unwrap(), "fields");
    assert_eq!(cursor.metadata().column_type(1).unwrap(), ValueType::Map);
}

// ============================================================================
// Empty Result Sets
// ============================================================================

#[test]
fn empty_set_is_before_first_and_after_last() {
    let mut cursor = open(json!([]));

    assert!(cursor.schema().is_empty());
    assert!(cursor.is_before_first());
    assert!(cursor.is_after_last());
    assert!(!cursor.is_first());
    assert!(!cursor.is_last());

    for _ in 0..3 {
        assert!(!cursor.advance());
    }
    assert!(cursor.row() <= 0);
}

#[test]
fn empty_set_first_and_last_differ() {
    // Both moves report success on an empty set, but land in different
    // places: first sets the counter to 0, last to -1. Kept for compatibility.
    let mut cursor = open(json!([]));

    assert!(cursor.move_to_last());
    assert_eq!(cursor.row(), -1);
    assert!(cursor.is_before_first());

    assert!(cursor.move_to_first());
    assert_eq!(cursor.row(), 0);
    assert!(matches!(cursor.get_value("A"), Err(Error::NoCurrentRow)));
}

#[test]
fn list_response_with_no_records() {
    let cursor = open(json!({"records": []}));
    assert!(cursor.is_empty());
    assert_eq!(cursor.metadata().column_count(), 0);
}

// ============================================================================
// Navigation
// ============================================================================

#[test]
fn advance_stops_after_size_moves() {
    let size = 4;
    let mut cursor = open(json!((0..size).map(wrapped).collect::<Vec<_>>()));

    let moved = (0..size + 3).filter(|_| cursor.advance()).count();

    assert_eq!(moved, size);
    assert_eq!(cursor.row(), size as isize);
    assert!(cursor.is_after_last());
    assert!(matches!(cursor.get_value(1), Err(Error::NoCurrentRow)));
}

#[test]
fn rewind_replays_rows_in_order() {
    let mut cursor = open(json!((0..5).map(wrapped).collect::<Vec<_>>()));
    while cursor.advance() {}

    assert!(cursor.move_to_first());
    let mut ids = Vec::new();
    loop {
        ids.push(cursor.get_string(1).unwrap().unwrap());
        if !cursor.advance() {
            break;
        }
    }

    assert_eq!(ids, vec!["rec0", "rec1", "rec2", "rec3", "rec4"]);
}

#[test]
fn single_row_is_first_and_last() {
    let mut cursor = open(json!([wrapped(0)]));
    assert!(cursor.advance());
    assert!(cursor.is_first());
    assert!(cursor.is_last());
    assert!(!cursor.advance());
}

// ============================================================================
// Access
// ============================================================================

#[test]
fn top_level_values_shadow_wrapper_values() {
    let mut cursor = open(json!([
        {"id": "outer", "fields": {"id": "inner", "x": 1}}
    ]));
    cursor.advance();

    // Both positions carry the name "id" and resolve to the top-level field.
    assert_eq!(cursor.get_string(1).unwrap().as_deref(), Some("outer"));
    assert_eq!(cursor.get_string(2).unwrap().as_deref(), Some("outer"));
    assert_eq!(cursor.find_column("id").unwrap(), 2);
}

#[test]
fn opaque_maps_and_lists() {
    let mut cursor = open(json!([
        {"fields": {"Owner": {"id": "usr1", "email": "a@b.c"}, "Tags": ["x", "y"]}}
    ]));
    cursor.advance();

    let owner = cursor.get_map("Owner").unwrap().unwrap();
    assert_eq!(owner.get("email"), Some(&FieldValue::Text("a@b.c".into())));
    assert_eq!(cursor.get_list("Tags").unwrap().len(), 2);
    assert_eq!(cursor.get_value(1).unwrap().unwrap().value_type(), ValueType::Map);
}

#[test]
fn temporal_values_when_detection_enabled() {
    let config = Config::default().with_detect_temporal(true);
    let rows = records_from_json(
        json!([{"createdTime": "2024-05-01T08:00:00.000Z", "fields": {"Due": "2024-06-30"}}]),
        &config,
    )
    .unwrap();
    let mut cursor = Cursor::with_config(rows, StatementHandle::new(), config);
    cursor.advance();

    let created = cursor.get_timestamp("createdTime").unwrap().unwrap();
    assert_eq!(created.to_rfc3339(), "2024-05-01T08:00:00+00:00");
    assert_eq!(cursor.get_date("Due").unwrap().unwrap().to_string(), "2024-06-30");
    assert_eq!(cursor.get_string("Due").unwrap(), None);
    assert!(matches!(
        cursor.must_get::<String>("Due"),
        Err(Error::TypeMismatch { .. })
    ));
}

#[test]
fn integers_out_of_range_for_narrow_types() {
    let mut cursor = open(json!([{"fields": {"Big": 70000}}]));
    cursor.advance();

    assert_eq!(cursor.get_short("Big").unwrap(), 0);
    assert_eq!(cursor.get_int("Big").unwrap(), 70000);
    assert!(matches!(
        cursor.must_get::<i16>("Big"),
        Err(Error::TypeMismatch { expected, got, .. })
            if expected == "Integer (16-bit)" && got == "Integer"
    ));
}

// ============================================================================
// Read-only Surface
// ============================================================================

#[test]
fn mutations_are_unsupported_and_change_nothing() {
    let mut cursor = open(json!([wrapped(0), wrapped(1)]));
    cursor.advance();
    let before = cursor.get_value(3).unwrap().cloned();

    assert!(matches!(cursor.update(3, "new"), Err(Error::Unsupported(_))));
    assert!(matches!(cursor.update("B", 9i64), Err(Error::Unsupported(_))));
    assert!(matches!(cursor.update_null("A"), Err(Error::Unsupported(_))));
    assert!(matches!(cursor.insert_row(), Err(Error::Unsupported(_))));
    assert!(matches!(cursor.update_row(), Err(Error::Unsupported(_))));
    assert!(matches!(cursor.delete_row(), Err(Error::Unsupported(_))));
    assert!(matches!(cursor.refresh_row(), Err(Error::Unsupported(_))));
    assert!(matches!(cursor.cancel_row_updates(), Err(Error::Unsupported(_))));
    assert!(matches!(cursor.move_to_insert_row(), Err(Error::Unsupported(_))));
    assert!(matches!(cursor.move_to_current_row(), Err(Error::Unsupported(_))));

    assert_eq!(cursor.row(), 0);
    assert_eq!(cursor.len(), 2);
    assert_eq!(cursor.get_value(3).unwrap().cloned(), before);
    assert!(!cursor.row_updated());
    assert!(!cursor.row_inserted());
    assert!(!cursor.row_deleted());
}

#[test]
fn streams_and_advanced_types_are_unsupported() {
    let mut cursor = open(json!([wrapped(0)]));
    cursor.advance();

    assert!(matches!(cursor.ascii_stream(3), Err(Error::Unsupported(_))));
    assert!(matches!(cursor.binary_stream("A"), Err(Error::Unsupported(_))));
    assert!(matches!(cursor.character_stream("A"), Err(Error::Unsupported(_))));
    for kind in [AdvancedType::Blob, AdvancedType::Clob, AdvancedType::Url] {
        assert!(matches!(
            cursor.get_advanced("A", kind),
            Err(Error::Unsupported(_))
        ));
    }
    assert_eq!(cursor.row(), 0);
}

#[test]
fn close_delegates_to_statement() {
    let mut cursor = open(json!([wrapped(0)]));
    cursor.advance();
    assert_eq!(cursor.get_long("B").unwrap(), 0);

    cursor.close().unwrap();
    assert!(cursor.statement().is_closed());
    assert!(matches!(cursor.get_long("B"), Err(Error::ResourceClosed)));

    // Closing again is forwarded and harmless
    assert!(cursor.close().is_ok());
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_advance_never_exceeds_size(size in 0usize..20, calls in 0usize..40) {
        let mut cursor = open(json!((0..size).map(wrapped).collect::<Vec<_>>()));

        let moved = (0..calls).filter(|_| cursor.advance()).count();

        prop_assert_eq!(moved, calls.min(size));
        prop_assert!(cursor.row() <= size as isize);
    }

    #[test]
    fn prop_named_and_positional_access_agree(size in 1usize..10, pick in 0usize..10) {
        let mut cursor = open(json!((0..size).map(wrapped).collect::<Vec<_>>()));
        for _ in 0..=(pick % size) {
            cursor.advance();
        }

        for name in ["id", "createdTime", "A", "B", "C"] {
            let position = cursor.find_column(name).unwrap();
            prop_assert_eq!(
                cursor.get_value(name).unwrap(),
                cursor.get_value(position).unwrap()
            );
        }
    }

    #[test]
    fn prop_rewind_reproduces_records(values in proptest::collection::vec(any::<i64>(), 1..15)) {
        let rows: Vec<_> = values.iter().map(|v| json!({"fields": {"V": v}})).collect();
        let mut cursor = open(json!(rows));
        while cursor.advance() {}

        cursor.move_to_first();
        let mut seen = vec![cursor.get_long(1).unwrap()];
        while cursor.advance() {
            seen.push(cursor.get_long(1).unwrap());
        }

        prop_assert_eq!(seen, values);
    }
}
