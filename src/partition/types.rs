//! Partition types

use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};

/// Key-value data handed from a parent record to a dependent stream
///
/// Used to fill path placeholders and to key per-partition bookmarks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context(JsonObject);

impl Context {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value to the context
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the context is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow as a JSON object
    pub fn as_object(&self) -> &JsonObject {
        &self.0
    }

    /// Iterate over the entries
    pub fn iter(&self) -> impl Iterator<Item = (&String, &JsonValue)> {
        self.0.iter()
    }

    /// Stable identifier, used for logging and bookmark lookup
    pub fn id(&self) -> String {
        JsonValue::Object(self.0.clone()).to_string()
    }
}

impl From<JsonObject> for Context {
    fn from(map: JsonObject) -> Self {
        Self(map)
    }
}

impl From<Context> for JsonValue {
    fn from(context: Context) -> Self {
        JsonValue::Object(context.0)
    }
}
