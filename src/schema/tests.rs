//! Schema tests

use super::builders::*;
use super::*;
use crate::types::JsonObject;
use pretty_assertions::assert_eq;
use serde_json::json;

fn record(value: serde_json::Value) -> JsonObject {
    value.as_object().cloned().unwrap()
}

fn sample_schema() -> JsonSchema {
    JsonSchema::from_properties([
        ("id", integer().with_description("The ID")),
        ("label", string()),
        ("paused", boolean()),
        ("updated_at", datetime()),
        (
            "destination_attributes",
            object([("connection_id", integer()), ("object", string())]),
        ),
        ("connection_details", free_object()),
        ("sync_trigger_reason", map_of(string())),
        (
            "mappings",
            array(object([("to", string()), ("is_primary_identifier", boolean())])),
        ),
    ])
}

#[test]
fn test_serialized_shape() {
    let schema = sample_schema();
    let value = schema.to_json();

    assert_eq!(value["type"], "object");
    assert_eq!(value["properties"]["id"]["type"], json!(["integer", "null"]));
    assert_eq!(value["properties"]["id"]["description"], "The ID");
    assert_eq!(value["properties"]["updated_at"]["format"], "date-time");
    assert_eq!(
        value["properties"]["mappings"]["items"]["properties"]["to"]["type"],
        json!(["string", "null"])
    );
    assert_eq!(
        value["properties"]["sync_trigger_reason"]["additionalProperties"],
        json!({"type": ["string", "null"]})
    );
    assert_eq!(
        value["properties"]["connection_details"]["additionalProperties"],
        json!(true)
    );
    assert!(value.get("required").is_none());
}

#[test]
fn test_schema_roundtrips_through_serde() {
    let schema = sample_schema();
    let parsed: JsonSchema = serde_json::from_value(schema.to_json()).unwrap();
    assert_eq!(parsed, schema);
}

#[test]
fn test_nullable_type_helpers() {
    let prop = integer();
    assert!(prop.is_nullable());
    assert_eq!(prop.json_type.primary_type(), Some(JsonType::Integer));
    assert_eq!(prop.json_type.to_string(), "integer | null");
    assert!(!SchemaProperty::new(JsonType::String).is_nullable());
}

#[test]
fn test_integer_type_matching() {
    assert!(JsonType::Integer.matches(&json!(42)));
    assert!(JsonType::Integer.matches(&json!(-7)));
    assert!(!JsonType::Integer.matches(&json!(1.5)));
    assert!(!JsonType::Integer.matches(&json!("42")));
    assert!(JsonType::Number.matches(&json!(1.5)));
}

#[test]
fn test_validate_conforming_record() {
    let schema = sample_schema();
    let issues = schema.validate(&record(json!({
        "id": 1,
        "label": null,
        "paused": false,
        "updated_at": "2024-01-02T03:04:05Z",
        "destination_attributes": {"connection_id": 3, "object": "contact"},
        "connection_details": {"anything": [1, 2]},
        "sync_trigger_reason": {"ui_tag": "x"},
        "mappings": [{"to": "email", "is_primary_identifier": true}]
    })));
    assert!(issues.is_empty(), "{issues:?}");
}

#[test]
fn test_validate_reports_type_mismatch() {
    let schema = sample_schema();
    let issues = schema.validate(&record(json!({"id": "one", "paused": "yes"})));

    let paths: Vec<&str> = issues.iter().map(|i| i.path.as_str()).collect();
    assert_eq!(paths, vec!["id", "paused"]);
    assert_eq!(issues[0].message, "expected integer | null, got string");
}

#[test]
fn test_validate_reports_bad_datetime() {
    let schema = sample_schema();
    let issues = schema.validate(&record(json!({"updated_at": "yesterday"})));
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].path, "updated_at");
}

#[test]
fn test_validate_nested_paths() {
    let schema = sample_schema();
    let issues = schema.validate(&record(json!({
        "destination_attributes": {"connection_id": "x"},
        "sync_trigger_reason": {"ui_tag": 5},
        "mappings": [{"is_primary_identifier": "no"}]
    })));

    let paths: Vec<String> = issues.iter().map(|i| i.path.clone()).collect();
    assert_eq!(
        paths,
        vec![
            "destination_attributes.connection_id".to_string(),
            "mappings[].is_primary_identifier".to_string(),
            "sync_trigger_reason.ui_tag".to_string(),
        ]
    );
}

#[test]
fn test_validate_required() {
    let mut schema = sample_schema();
    schema.add_required("id");
    schema.add_required("id");
    assert_eq!(schema.required, vec!["id".to_string()]);

    let issues = schema.validate(&record(json!({"label": "x"})));
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].to_string(), "id: required property is missing");
}

#[test]
fn test_conform_drops_undeclared_keys() {
    let schema = sample_schema();
    let (conformed, removed) = schema.conform(record(json!({
        "id": 1,
        "surprise": true,
        "destination_attributes": {"connection_id": 3, "extra": 1},
        "connection_details": {"kept": "yes"},
        "sync_trigger_reason": {"kept_too": "yes"},
        "mappings": [{"to": "email", "from": {"type": "column"}}]
    })));

    assert_eq!(
        serde_json::Value::Object(conformed),
        json!({
            "id": 1,
            "destination_attributes": {"connection_id": 3},
            "connection_details": {"kept": "yes"},
            "sync_trigger_reason": {"kept_too": "yes"},
            "mappings": [{"to": "email"}]
        })
    );
    assert_eq!(
        removed,
        vec![
            "destination_attributes.extra".to_string(),
            "mappings[].from".to_string(),
            "surprise".to_string(),
        ]
    );
}

#[test]
fn test_conform_keeps_extra_when_allowed() {
    let mut schema = sample_schema();
    schema.additional_properties = Some(true);
    let (conformed, removed) = schema.conform(record(json!({"id": 1, "surprise": true})));
    assert_eq!(conformed.len(), 2);
    assert!(removed.is_empty());
}

#[test]
fn test_conform_leaves_null_objects() {
    let schema = sample_schema();
    let (conformed, removed) =
        schema.conform(record(json!({"destination_attributes": null, "mappings": null})));
    assert_eq!(conformed["destination_attributes"], serde_json::Value::Null);
    assert_eq!(conformed["mappings"], serde_json::Value::Null);
    assert!(removed.is_empty());
}
