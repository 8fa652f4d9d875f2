//! Singer catalog
//!
//! Discovery output and stream selection. A discovered catalog passed back
//! via `--catalog` selects every stream through `selected-by-default`.

use crate::error::{Error, Result};
use crate::streams::StreamDefinition;
use crate::types::{JsonObject, JsonValue, ReplicationMethod};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashSet;
use std::path::Path;

/// Singer catalog document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub streams: Vec<CatalogEntry>,
}

/// One stream in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub tap_stream_id: String,
    pub stream: String,
    pub schema: JsonValue,
    #[serde(default)]
    pub key_properties: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_method: Option<ReplicationMethod>,
    #[serde(default)]
    pub metadata: Vec<MetadataEntry>,
}

/// Metadata attached to a breadcrumb (`[]` for the stream itself)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub breadcrumb: Vec<String>,
    pub metadata: JsonObject,
}

impl Catalog {
    /// Build the catalog describing `streams`
    pub fn discover(streams: &[StreamDefinition]) -> Self {
        Self {
            streams: streams.iter().map(CatalogEntry::from_stream).collect(),
        }
    }

    /// Read a catalog file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse a catalog from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::catalog(format!("Invalid catalog: {e}")))
    }

    /// Entry for a stream
    pub fn get(&self, tap_stream_id: &str) -> Option<&CatalogEntry> {
        self.streams.iter().find(|e| e.tap_stream_id == tap_stream_id)
    }

    /// Resolve which of `streams` to emit and which to fetch
    pub fn selection(&self, streams: &[StreamDefinition]) -> Selection {
        let known: HashSet<&str> = streams.iter().map(|s| s.name.as_str()).collect();
        for entry in &self.streams {
            if !known.contains(entry.tap_stream_id.as_str()) {
                tracing::warn!(
                    stream = %entry.tap_stream_id,
                    "Unknown stream in catalog, ignoring"
                );
            }
        }

        let selected = streams
            .iter()
            .filter(|s| self.get(&s.name).is_some_and(CatalogEntry::is_selected))
            .map(|s| s.name.clone());
        Selection::resolve(streams, selected)
    }
}

impl CatalogEntry {
    /// Catalog entry for a stream definition
    pub fn from_stream(stream: &StreamDefinition) -> Self {
        let method = stream.replication_method();

        let mut root = JsonObject::new();
        root.insert("inclusion".into(), json!("available"));
        root.insert("selected-by-default".into(), json!(true));
        root.insert("table-key-properties".into(), json!(stream.primary_key));
        if let Some(key) = &stream.replication_key {
            root.insert("valid-replication-keys".into(), json!([key]));
        }
        root.insert("forced-replication-method".into(), json!(method.as_str()));
        if let Some(parent) = stream.parent_stream() {
            root.insert("parent-tap-stream-id".into(), json!(parent));
        }

        let mut metadata = vec![MetadataEntry {
            breadcrumb: Vec::new(),
            metadata: root,
        }];

        for name in stream.schema.properties.keys() {
            let automatic = stream.primary_key.contains(name)
                || stream.replication_key.as_ref() == Some(name);
            let mut property = JsonObject::new();
            if automatic {
                property.insert("inclusion".into(), json!("automatic"));
            } else {
                property.insert("inclusion".into(), json!("available"));
                property.insert("selected-by-default".into(), json!(true));
            }
            metadata.push(MetadataEntry {
                breadcrumb: vec!["properties".to_string(), name.clone()],
                metadata: property,
            });
        }

        Self {
            tap_stream_id: stream.name.clone(),
            stream: stream.name.clone(),
            schema: stream.schema.to_json(),
            key_properties: stream.primary_key.clone(),
            replication_key: stream.replication_key.clone(),
            replication_method: Some(method),
            metadata,
        }
    }

    /// Stream-level metadata
    pub fn root_metadata(&self) -> Option<&JsonObject> {
        self.metadata
            .iter()
            .find(|m| m.breadcrumb.is_empty())
            .map(|m| &m.metadata)
    }

    /// `selected`, falling back to `selected-by-default`
    pub fn is_selected(&self) -> bool {
        let Some(root) = self.root_metadata() else {
            return false;
        };
        root.get("selected")
            .and_then(JsonValue::as_bool)
            .or_else(|| root.get("selected-by-default").and_then(JsonValue::as_bool))
            .unwrap_or(false)
    }
}

/// Streams to emit, and streams to fetch (emitted ones plus the parents
/// needed to derive their contexts)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    emit: HashSet<String>,
    fetch: HashSet<String>,
}

impl Selection {
    /// Every stream emitted
    pub fn all(streams: &[StreamDefinition]) -> Self {
        Self::resolve(streams, streams.iter().map(|s| s.name.clone()))
    }

    fn resolve(streams: &[StreamDefinition], selected: impl IntoIterator<Item = String>) -> Self {
        let emit: HashSet<String> = selected.into_iter().collect();
        let mut fetch = emit.clone();

        for stream in streams.iter().filter(|s| emit.contains(&s.name)) {
            let mut parent = stream.parent_stream();
            while let Some(name) = parent {
                fetch.insert(name.to_string());
                parent = streams
                    .iter()
                    .find(|s| s.name == name)
                    .and_then(StreamDefinition::parent_stream);
            }
        }

        Self { emit, fetch }
    }

    /// Whether records of `stream` are written
    pub fn is_emitted(&self, stream: &str) -> bool {
        self.emit.contains(stream)
    }

    /// Whether `stream` is requested at all
    pub fn is_fetched(&self, stream: &str) -> bool {
        self.fetch.contains(stream)
    }

    pub fn is_empty(&self) -> bool {
        self.fetch.is_empty()
    }
}
