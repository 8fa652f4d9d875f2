//! Partition router implementations

use super::types::Context;
use crate::error::{Error, Result};
use crate::types::JsonObject;
use serde_json::Value;

/// Parent stream-based partition router
///
/// Derives one child context per parent record by copying the parent's key
/// field under the child's context key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRouter {
    /// Name of the parent stream
    parent_stream: String,
    /// Field read from each parent record
    parent_key: String,
    /// Key written into the child context
    context_key: String,
}

impl ParentRouter {
    /// Create a new parent router
    pub fn new(
        parent_stream: impl Into<String>,
        parent_key: impl Into<String>,
        context_key: impl Into<String>,
    ) -> Self {
        Self {
            parent_stream: parent_stream.into(),
            parent_key: parent_key.into(),
            context_key: context_key.into(),
        }
    }

    /// Router copying `id` into `<parent>_id`, the Census convention
    pub fn by_id(parent_stream: impl Into<String>, context_key: impl Into<String>) -> Self {
        Self::new(parent_stream, "id", context_key)
    }

    /// Name of the parent stream
    pub fn parent_stream(&self) -> &str {
        &self.parent_stream
    }

    /// Field read from parent records
    pub fn parent_key(&self) -> &str {
        &self.parent_key
    }

    /// Key written into child contexts
    pub fn context_key(&self) -> &str {
        &self.context_key
    }

    /// Derive the child context for one parent record
    pub fn child_context(&self, record: &JsonObject) -> Result<Context> {
        match record.get(&self.parent_key) {
            Some(value @ (Value::Number(_) | Value::String(_))) => {
                Ok(Context::new().with_value(self.context_key.clone(), value.clone()))
            }
            Some(other) => Err(Error::child_context(
                &self.parent_stream,
                format!("'{}' must be a number or string, got {other}", self.parent_key),
            )),
            None => Err(Error::child_context(
                &self.parent_stream,
                format!("record has no '{}' field", self.parent_key),
            )),
        }
    }

    /// Derive child contexts for a batch of parent records, in order
    pub fn partitions(&self, records: &[JsonObject]) -> Result<Vec<Context>> {
        records.iter().map(|r| self.child_context(r)).collect()
    }
}
