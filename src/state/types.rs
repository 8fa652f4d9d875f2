//! State types for tracking sync progress
//!
//! Serialized as the Singer bookmarks document and round-tripped between
//! runs via `--state`.

use crate::partition::Context;
use crate::types::{JsonObject, JsonValue};
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Complete tap state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Per-stream bookmarks
    #[serde(default)]
    pub bookmarks: BTreeMap<String, StreamBookmark>,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Bookmarks for a stream
    pub fn get_stream(&self, stream: &str) -> Option<&StreamBookmark> {
        self.bookmarks.get(stream)
    }

    /// Mutable bookmarks for a stream, creating if needed
    pub fn get_stream_mut(&mut self, stream: &str) -> &mut StreamBookmark {
        self.bookmarks.entry(stream.to_string()).or_default()
    }

    /// Stored replication key value for a stream or one of its partitions
    pub fn bookmark(&self, stream: &str, context: Option<&Context>) -> Option<&JsonValue> {
        let stream = self.get_stream(stream)?;
        match context {
            None => stream.replication_key_value.as_ref(),
            Some(ctx) => stream.get_partition(ctx)?.replication_key_value.as_ref(),
        }
    }

    /// Raise the bookmark to `value` if it is newer; returns whether it moved
    pub fn advance(
        &mut self,
        stream: &str,
        context: Option<&Context>,
        replication_key: &str,
        value: &JsonValue,
    ) -> bool {
        if value.is_null() {
            return false;
        }
        let stream = self.get_stream_mut(stream);
        let slot = match context {
            None => &mut stream.bookmark,
            Some(ctx) => &mut stream.get_partition_mut(ctx).bookmark,
        };
        slot.advance(replication_key, value)
    }

    /// Serialize to a JSON value
    pub fn to_value(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Replication key and the highest value seen for it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key_value: Option<JsonValue>,
}

impl Bookmark {
    fn advance(&mut self, replication_key: &str, value: &JsonValue) -> bool {
        let newer = match &self.replication_key_value {
            Some(current) if self.replication_key.as_deref() == Some(replication_key) => {
                compare_bookmarks(value, current) == Ordering::Greater
            }
            _ => true,
        };
        if newer {
            self.replication_key = Some(replication_key.to_string());
            self.replication_key_value = Some(value.clone());
        }
        newer
    }
}

/// Bookmarks for a single stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamBookmark {
    /// Stream-level bookmark, used by parent streams
    #[serde(flatten)]
    pub bookmark: Bookmark,

    /// Per-context bookmarks, used by child streams
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub partitions: Vec<PartitionBookmark>,

    /// Keys written by other tools, kept as-is
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl std::ops::Deref for StreamBookmark {
    type Target = Bookmark;

    fn deref(&self) -> &Bookmark {
        &self.bookmark
    }
}

impl StreamBookmark {
    /// Partition bookmark for a context
    pub fn get_partition(&self, context: &Context) -> Option<&PartitionBookmark> {
        self.partitions.iter().find(|p| &p.context == context)
    }

    /// Mutable partition bookmark for a context, creating if needed
    pub fn get_partition_mut(&mut self, context: &Context) -> &mut PartitionBookmark {
        let index = match self.partitions.iter().position(|p| &p.context == context) {
            Some(index) => index,
            None => {
                self.partitions.push(PartitionBookmark {
                    context: context.clone(),
                    bookmark: Bookmark::default(),
                });
                self.partitions.len() - 1
            }
        };
        &mut self.partitions[index]
    }
}

/// Bookmark for one child context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionBookmark {
    pub context: Context,

    #[serde(flatten)]
    pub bookmark: Bookmark,
}

impl std::ops::Deref for PartitionBookmark {
    type Target = Bookmark;

    fn deref(&self) -> &Bookmark {
        &self.bookmark
    }
}

/// Order two replication key values
///
/// RFC 3339 strings compare as instants, numbers numerically, anything else
/// by its string form.
pub fn compare_bookmarks(a: &JsonValue, b: &JsonValue) -> Ordering {
    if let (Some(a), Some(b)) = (a.as_str(), b.as_str()) {
        if let (Ok(a), Ok(b)) = (DateTime::parse_from_rfc3339(a), DateTime::parse_from_rfc3339(b)) {
            return a.cmp(&b);
        }
        return a.cmp(b);
    }
    if let (Some(a), Some(b)) = (a.as_f64(), b.as_f64()) {
        return a.partial_cmp(&b).unwrap_or(Ordering::Equal);
    }
    value_key(a).cmp(&value_key(b))
}

fn value_key(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
