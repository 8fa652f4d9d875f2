//! Singer message writer
//!
//! Serializes messages as JSON lines. Records pass through schema
//! conformance and validation first; both only ever warn.

use super::messages::Message;
use crate::error::Result;
use crate::streams::StreamDefinition;
use crate::types::{JsonObject, JsonValue};
use std::collections::{BTreeMap, HashSet};
use std::io::Write;

/// Writes Singer messages to any `Write` sink
pub struct MessageWriter<W: Write> {
    out: W,
    /// `(stream, path)` pairs already warned about
    warned: HashSet<(String, String)>,
    /// Records written per stream
    counts: BTreeMap<String, u64>,
}

impl<W: Write> MessageWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            warned: HashSet::new(),
            counts: BTreeMap::new(),
        }
    }

    /// Write one message as a single line
    pub fn write(&mut self, message: &Message) -> Result<()> {
        serde_json::to_writer(&mut self.out, message)?;
        self.out.write_all(b"\n")?;
        if message.is_state() {
            self.out.flush()?;
        }
        Ok(())
    }

    /// Write the SCHEMA message for a stream
    pub fn write_schema(&mut self, stream: &StreamDefinition) -> Result<()> {
        self.write(&Message::schema(stream))
    }

    /// Conform, validate and write a RECORD message
    pub fn write_record(&mut self, stream: &StreamDefinition, record: JsonObject) -> Result<()> {
        let (record, removed) = stream.schema.conform(record);
        for path in removed {
            if self.warn_once(&stream.name, &path) {
                tracing::warn!(
                    stream = %stream.name,
                    field = %path,
                    "Property not declared in schema, dropping it"
                );
            }
        }

        for issue in stream.schema.validate(&record) {
            if self.warn_once(&stream.name, &issue.path) {
                tracing::warn!(
                    stream = %stream.name,
                    field = %issue.path,
                    "Record does not match schema: {}",
                    issue.message
                );
            }
        }

        self.write(&Message::record(&stream.name, record))?;
        *self.counts.entry(stream.name.clone()).or_default() += 1;
        Ok(())
    }

    /// Write a STATE message and flush
    pub fn write_state(&mut self, value: JsonValue) -> Result<()> {
        self.write(&Message::state(value))
    }

    /// Records written so far for a stream
    pub fn records_written(&self, stream: &str) -> u64 {
        self.counts.get(stream).copied().unwrap_or(0)
    }

    /// Flush the underlying sink
    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    /// Consume the writer, returning the sink
    pub fn into_inner(self) -> W {
        self.out
    }

    fn warn_once(&mut self, stream: &str, path: &str) -> bool {
        self.warned.insert((stream.to_string(), path.to_string()))
    }
}
