//! State manager implementation
//!
//! Holds the bookmarks document shared by the sync engine. The tap never
//! writes state files itself; it emits STATE messages and the target
//! persists them.

use super::types::State;
use crate::error::{Error, Result};
use crate::partition::Context;
use crate::types::JsonValue;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared, lockable tap state
#[derive(Debug, Clone, Default)]
pub struct StateManager {
    state: Arc<RwLock<State>>,
}

impl StateManager {
    /// Create an empty in-memory state manager
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Wrap an existing state
    pub fn with_state(state: State) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Load state from a file; a missing file yields empty state
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "State file not found, starting fresh");
            return Ok(Self::in_memory());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::state(format!("Failed to read state file: {e}")))?;
        if contents.trim().is_empty() {
            return Ok(Self::in_memory());
        }
        Self::from_json(&contents)
    }

    /// Parse state from an inline JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let state: State = serde_json::from_str(json)
            .map_err(|e| Error::state(format!("Failed to parse state JSON: {e}")))?;
        Ok(Self::with_state(state))
    }

    /// Get a read lock on the current state
    pub async fn state(&self) -> tokio::sync::RwLockReadGuard<'_, State> {
        self.state.read().await
    }

    /// Clone the current state
    pub async fn snapshot(&self) -> State {
        self.state.read().await.clone()
    }

    /// Current state as a JSON value, the payload of a STATE message
    pub async fn to_value(&self) -> JsonValue {
        self.state.read().await.to_value()
    }

    /// Stored bookmark for a stream or partition
    pub async fn bookmark(&self, stream: &str, context: Option<&Context>) -> Option<JsonValue> {
        self.state.read().await.bookmark(stream, context).cloned()
    }

    /// Raise a bookmark if `value` is newer
    pub async fn advance_bookmark(
        &self,
        stream: &str,
        context: Option<&Context>,
        replication_key: &str,
        value: &JsonValue,
    ) -> bool {
        self.state
            .write()
            .await
            .advance(stream, context, replication_key, value)
    }
}
