//! Record lookup by `"id"` across the three payload shapes.
//!
//! The id is always compared as text. JSON string ids must match exactly;
//! JSON number ids match their serde_json decimal rendering (`1` matches
//! `"1"`, `1.5` matches `"1.5"`). Ids of any other JSON type never match.

use serde_json::Value;

use super::types::{Datasource, JsonRecord, Payload, RecordRef};

/// Field that identifies a record.
pub const ID_FIELD: &str = "id";

/// Find the first record whose id equals `id`.
pub fn find_by_id<'a>(datasource: &'a Datasource, id: &str) -> Option<RecordRef<'a>> {
    find_in_payload(datasource.payload(), id)
}

/// Same as [`find_by_id`], over a bare payload.
pub fn find_in_payload<'a>(payload: &'a Payload, id: &str) -> Option<RecordRef<'a>> {
    match payload {
        Payload::RecordList(rows) => rows
            .iter()
            .find(|row| row.get(ID_FIELD).is_some_and(|v| v == id))
            .map(RecordRef::Text),

        Payload::TaggedRecordList(rows) => rows
            .iter()
            .find(|row| json_id_matches(row, id))
            .map(RecordRef::Json),

        // Only top-level fields are searched, in the map's own iteration order.
        Payload::Object(fields) => fields
            .values()
            .filter_map(Value::as_array)
            .flat_map(|items| items.iter().filter_map(Value::as_object))
            .find(|item| json_id_matches(item, id))
            .map(RecordRef::Json),
    }
}

fn json_id_matches(record: &JsonRecord, id: &str) -> bool {
    match record.get(ID_FIELD) {
        Some(Value::String(s)) => s == id,
        Some(Value::Number(n)) => n.to_string() == id,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::types::{Format, Record, TextRecord};
    use serde_json::json;
    use std::path::PathBuf;

    fn json_ds(value: Value) -> Datasource {
        let payload = match value {
            Value::Array(items) => Payload::TaggedRecordList(
                items
                    .into_iter()
                    .map(|v| v.as_object().cloned().unwrap())
                    .collect(),
            ),
            Value::Object(map) => Payload::Object(map),
            other => panic!("not a payload: {other}"),
        };
        Datasource::new(PathBuf::from("/data/test.json"), Format::Json, payload)
    }

    fn csv_ds(rows: &[&[(&str, &str)]]) -> Datasource {
        let rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect::<TextRecord>()
            })
            .collect();
        Datasource::new(
            PathBuf::from("/data/test.csv"),
            Format::Csv,
            Payload::RecordList(rows),
        )
    }

    fn name_of(record: Option<RecordRef<'_>>) -> Option<String> {
        record.and_then(|r| r.into_owned().field("name"))
    }

    #[test]
    fn test_csv_match_is_exact_text() {
        let ds = csv_ds(&[
            &[("id", "1"), ("name", "one")],
            &[("id", "01"), ("name", "zero-one")],
        ]);

        assert_eq!(name_of(find_by_id(&ds, "1")).as_deref(), Some("one"));
        assert_eq!(name_of(find_by_id(&ds, "01")).as_deref(), Some("zero-one"));
        assert!(find_by_id(&ds, "2").is_none());
    }

    #[test]
    fn test_csv_without_id_column() {
        let ds = csv_ds(&[&[("key", "1"), ("name", "one")]]);
        assert!(find_by_id(&ds, "1").is_none());
    }

    #[test]
    fn test_csv_returns_first_match() {
        let ds = csv_ds(&[
            &[("id", "7"), ("name", "first")],
            &[("id", "7"), ("name", "second")],
        ]);
        assert_eq!(name_of(find_by_id(&ds, "7")).as_deref(), Some("first"));
    }

    #[test]
    fn test_array_numeric_ids() {
        let ds = json_ds(json!([
            {"id": 1, "name": "Test", "age": 100},
            {"id": 2, "name": "Test2", "age": 25}
        ]));

        let found = find_by_id(&ds, "1").unwrap().into_owned();
        assert_eq!(
            serde_json::to_value(&found).unwrap(),
            json!({"id": 1, "name": "Test", "age": 100})
        );
        assert_eq!(name_of(find_by_id(&ds, "2")).as_deref(), Some("Test2"));
        assert!(find_by_id(&ds, "3").is_none());
    }

    #[test]
    fn test_array_string_ids() {
        let ds = json_ds(json!([{"id": "abc", "name": "a"}, {"id": "DEF", "name": "d"}]));
        assert_eq!(name_of(find_by_id(&ds, "DEF")).as_deref(), Some("d"));
        assert!(find_by_id(&ds, "def").is_none());
    }

    #[test]
    fn test_array_float_and_negative_ids() {
        let ds = json_ds(json!([{"id": 1.5, "name": "f"}, {"id": -3, "name": "n"}]));
        assert_eq!(name_of(find_by_id(&ds, "1.5")).as_deref(), Some("f"));
        assert_eq!(name_of(find_by_id(&ds, "-3")).as_deref(), Some("n"));
    }

    #[test]
    fn test_other_id_types_never_match() {
        let ds = json_ds(json!([
            {"id": true, "name": "bool"},
            {"id": null, "name": "null"},
            {"id": ["1"], "name": "array"},
            {"id": {"v": 1}, "name": "object"}
        ]));
        for id in ["true", "null", "1", "[\"1\"]"] {
            assert!(find_by_id(&ds, id).is_none(), "{id} should not match");
        }
    }

    #[test]
    fn test_object_searches_nested_lists() {
        let ds = json_ds(json!({
            "result": [
                {"id": "abc", "name": "a"},
                {"id": "DEF", "name": "d"}
            ]
        }));
        assert_eq!(name_of(find_by_id(&ds, "DEF")).as_deref(), Some("d"));
        assert!(find_by_id(&ds, "xyz").is_none());
    }

    #[test]
    fn test_object_skips_non_list_fields_and_non_object_items() {
        let ds = json_ds(json!({
            "count": 2,
            "meta": {"id": "meta"},
            "tags": ["x", 1, null],
            "items": [{"id": 9, "name": "nine"}]
        }));
        assert!(find_by_id(&ds, "meta").is_none());
        assert_eq!(name_of(find_by_id(&ds, "9")).as_deref(), Some("nine"));
    }

    #[test]
    fn test_object_does_not_recurse_deeper() {
        let ds = json_ds(json!({
            "outer": {"inner": [{"id": "deep"}]}
        }));
        assert!(find_by_id(&ds, "deep").is_none());
    }

    #[test]
    fn test_object_duplicate_ids_resolve_consistently() {
        let ds = json_ds(json!({
            "zeta": [{"id": 1, "name": "from-zeta"}],
            "alpha": [{"id": 1, "name": "from-alpha"}]
        }));
        let first = name_of(find_by_id(&ds, "1")).unwrap();
        assert!(first == "from-alpha" || first == "from-zeta");
        for _ in 0..5 {
            assert_eq!(name_of(find_by_id(&ds, "1")).as_deref(), Some(first.as_str()));
        }
    }

    #[test]
    fn test_record_ref_serialises_like_source() {
        let ds = csv_ds(&[&[("id", "1"), ("name", "Test")]]);
        let record = find_by_id(&ds, "1").unwrap();
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"id":"1","name":"Test"}"#
        );
        assert!(matches!(record.into_owned(), Record::Text(_)));
    }
}
