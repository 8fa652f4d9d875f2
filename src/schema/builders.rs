//! Shorthand constructors for declaring stream schemas
//!
//! Every property built here is nullable; the API omits or nulls fields
//! freely and records are still emitted.

use super::types::{AdditionalProperties, JsonType, SchemaProperty};
use std::collections::BTreeMap;

/// Nullable integer
pub fn integer() -> SchemaProperty {
    SchemaProperty::nullable(JsonType::Integer)
}

/// Nullable string
pub fn string() -> SchemaProperty {
    SchemaProperty::nullable(JsonType::String)
}

/// Nullable boolean
pub fn boolean() -> SchemaProperty {
    SchemaProperty::nullable(JsonType::Boolean)
}

/// Nullable RFC 3339 timestamp
pub fn datetime() -> SchemaProperty {
    SchemaProperty::nullable(JsonType::String).with_format("date-time")
}

/// Nullable object with declared properties; undeclared keys are dropped
pub fn object<'a>(
    properties: impl IntoIterator<Item = (&'a str, SchemaProperty)>,
) -> SchemaProperty {
    let properties: BTreeMap<String, SchemaProperty> = properties
        .into_iter()
        .map(|(name, prop)| (name.to_string(), prop))
        .collect();
    SchemaProperty {
        properties: Some(properties),
        ..SchemaProperty::nullable(JsonType::Object)
    }
}

/// Nullable object whose keys are not known up front
pub fn free_object() -> SchemaProperty {
    SchemaProperty {
        additional_properties: Some(AdditionalProperties::Allowed(true)),
        ..SchemaProperty::nullable(JsonType::Object)
    }
}

/// Nullable object mapping arbitrary keys to values of `values`
pub fn map_of(values: SchemaProperty) -> SchemaProperty {
    SchemaProperty {
        properties: Some(BTreeMap::new()),
        additional_properties: Some(AdditionalProperties::Schema(Box::new(values))),
        ..SchemaProperty::nullable(JsonType::Object)
    }
}

/// Nullable array of `items`
pub fn array(items: SchemaProperty) -> SchemaProperty {
    SchemaProperty {
        items: Some(Box::new(items)),
        ..SchemaProperty::nullable(JsonType::Array)
    }
}
