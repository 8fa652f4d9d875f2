//! Engine types

use std::collections::BTreeMap;

/// Statistics from a sync operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Records written, all streams
    pub records_synced: usize,
    /// Pages fetched, all streams
    pub pages_fetched: usize,
    /// Streams fetched (including parents fetched only for their children)
    pub streams_synced: usize,
    /// Child partitions completed
    pub partitions_synced: usize,
    /// Records written per stream
    pub records_by_stream: BTreeMap<String, usize>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one written record
    pub fn add_record(&mut self, stream: &str) {
        self.records_synced += 1;
        *self.records_by_stream.entry(stream.to_string()).or_default() += 1;
    }

    /// Add a page
    pub fn add_page(&mut self) {
        self.pages_fetched += 1;
    }

    /// Add a stream
    pub fn add_stream(&mut self) {
        self.streams_synced += 1;
    }

    /// Add a partition
    pub fn add_partition(&mut self) {
        self.partitions_synced += 1;
    }

    /// Records written for one stream
    pub fn records_for(&self, stream: &str) -> usize {
        self.records_by_stream.get(stream).copied().unwrap_or(0)
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
