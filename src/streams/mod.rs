//! Census stream registry
//!
//! Six streams in three parent/child pairs:
//!
//! ```text
//! syncs         ──► sync_runs            (/api/v1/syncs/{sync_id}/sync_runs)
//! destinations  ──► destination_objects  (/api/v1/destinations/{destination_id}/objects)
//! sources       ──► source_objects       (/api/v1/sources/{source_id}/objects)
//! ```

mod destinations;
mod sources;
mod syncs;

use crate::error::{Error, Result};
use crate::partition::ParentRouter;
use crate::schema::JsonSchema;
use crate::types::ReplicationMethod;

/// Static description of one stream
#[derive(Debug, Clone)]
pub struct StreamDefinition {
    /// Stream name, used as `tap_stream_id`
    pub name: String,

    /// Request path, possibly with `{placeholders}` filled from the context
    pub path: String,

    /// Primary key fields
    pub primary_key: Vec<String>,

    /// Bookmark field for incremental replication
    pub replication_key: Option<String>,

    /// Parent link for child streams
    pub parent: Option<ParentRouter>,

    /// Record schema
    pub schema: JsonSchema,
}

impl StreamDefinition {
    /// Create a top-level stream with an `id` primary key
    pub fn new(name: &str, path: &str, schema: JsonSchema) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            primary_key: vec!["id".to_string()],
            replication_key: None,
            parent: None,
            schema,
        }
    }

    #[must_use]
    pub fn with_primary_key(mut self, fields: &[&str]) -> Self {
        self.primary_key = fields.iter().map(ToString::to_string).collect();
        self
    }

    #[must_use]
    pub fn with_replication_key(mut self, field: &str) -> Self {
        self.replication_key = Some(field.to_string());
        self
    }

    /// Attach to a parent stream; the child context is `{context_key: parent.id}`
    #[must_use]
    pub fn child_of(mut self, parent_stream: &str, context_key: &str) -> Self {
        self.parent = Some(ParentRouter::by_id(parent_stream, context_key));
        self
    }

    pub fn replication_method(&self) -> ReplicationMethod {
        ReplicationMethod::for_key(self.replication_key.as_deref())
    }

    pub fn is_child(&self) -> bool {
        self.parent.is_some()
    }

    /// Name of the parent stream, if any
    pub fn parent_stream(&self) -> Option<&str> {
        self.parent.as_ref().map(ParentRouter::parent_stream)
    }
}

/// All streams in sync order; parents precede their children
pub fn all_streams() -> Vec<StreamDefinition> {
    vec![
        syncs::syncs(),
        syncs::sync_runs(),
        destinations::destinations(),
        destinations::destination_objects(),
        sources::sources(),
        sources::source_objects(),
    ]
}

/// Look up a stream by name
pub fn find_stream(name: &str) -> Result<StreamDefinition> {
    all_streams()
        .into_iter()
        .find(|s| s.name == name)
        .ok_or_else(|| Error::StreamNotFound {
            stream: name.to_string(),
        })
}
