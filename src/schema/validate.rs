//! Record validation and conformance against a stream schema
//!
//! Validation never rejects a record; it reports issues which the writer
//! logs. Conformance removes keys the schema does not declare.

use super::types::{AdditionalProperties, JsonSchema, JsonType, SchemaProperty};
use crate::types::JsonObject;
use serde_json::Value;
use std::fmt;

/// A single mismatch between a record and its schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Dotted path to the offending value (`[]` marks array items)
    pub path: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

impl JsonSchema {
    /// Check a record against this schema
    pub fn validate(&self, record: &JsonObject) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for name in &self.required {
            if !record.contains_key(name) {
                issues.push(ValidationIssue {
                    path: name.clone(),
                    message: "required property is missing".to_string(),
                });
            }
        }

        for (key, value) in record {
            match self.properties.get(key) {
                Some(prop) => validate_value(prop, value, key, &mut issues),
                None if self.additional_properties == Some(false) => {
                    issues.push(ValidationIssue {
                        path: key.clone(),
                        message: "property is not declared".to_string(),
                    });
                }
                None => {}
            }
        }

        issues
    }

    /// Drop undeclared keys, returning the conformed record and the dotted
    /// paths that were removed
    pub fn conform(&self, record: JsonObject) -> (JsonObject, Vec<String>) {
        let mut removed = Vec::new();
        let keep_extra = self.allows_additional();
        let mut out = JsonObject::new();

        for (key, value) in record {
            match self.properties.get(&key) {
                Some(prop) => {
                    let value = conform_value(prop, value, &key, &mut removed);
                    out.insert(key, value);
                }
                None if keep_extra => {
                    out.insert(key, value);
                }
                None => removed.push(key),
            }
        }

        (out, removed)
    }
}

fn validate_value(
    prop: &SchemaProperty,
    value: &Value,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    if !prop.json_type.matches(value) {
        issues.push(ValidationIssue {
            path: path.to_string(),
            message: format!("expected {}, got {}", prop.json_type, value_type(value)),
        });
        return;
    }

    match value {
        Value::String(s) if prop.format.as_deref() == Some("date-time") => {
            if chrono::DateTime::parse_from_rfc3339(s).is_err() {
                issues.push(ValidationIssue {
                    path: path.to_string(),
                    message: format!("'{s}' is not an RFC 3339 date-time"),
                });
            }
        }
        Value::Object(map) => {
            let declared = prop.properties.as_ref();
            for (key, child) in map {
                let child_path = format!("{path}.{key}");
                match declared.and_then(|props| props.get(key)) {
                    Some(child_prop) => validate_value(child_prop, child, &child_path, issues),
                    None => match &prop.additional_properties {
                        Some(AdditionalProperties::Schema(extra)) => {
                            validate_value(extra, child, &child_path, issues);
                        }
                        Some(AdditionalProperties::Allowed(false)) => {
                            issues.push(ValidationIssue {
                                path: child_path,
                                message: "property is not declared".to_string(),
                            });
                        }
                        _ => {}
                    },
                }
            }
        }
        Value::Array(items) => {
            if let Some(item_prop) = &prop.items {
                let item_path = format!("{path}[]");
                for item in items {
                    validate_value(item_prop, item, &item_path, issues);
                }
            }
        }
        _ => {}
    }
}

fn conform_value(
    prop: &SchemaProperty,
    value: Value,
    path: &str,
    removed: &mut Vec<String>,
) -> Value {
    match value {
        Value::Object(map) if prop.json_type.primary_type() == Some(JsonType::Object) => {
            let keep_extra = prop.allows_additional();
            let mut out = JsonObject::new();
            for (key, child) in map {
                let declared = prop.properties.as_ref().and_then(|props| props.get(&key));
                match declared {
                    Some(child_prop) => {
                        let child_path = format!("{path}.{key}");
                        let child = conform_value(child_prop, child, &child_path, removed);
                        out.insert(key, child);
                    }
                    None if keep_extra => {
                        out.insert(key, child);
                    }
                    None => removed.push(format!("{path}.{key}")),
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => match &prop.items {
            Some(item_prop) => {
                let item_path = format!("{path}[]");
                Value::Array(
                    items
                        .into_iter()
                        .map(|item| conform_value(item_prop, item, &item_path, removed))
                        .collect(),
                )
            }
            None => Value::Array(items),
        },
        other => other,
    }
}

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
