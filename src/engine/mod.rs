//! Execution engine module
//!
//! Main read loop and stream orchestration.
//!
//! # Overview
//!
//! The engine module provides:
//! - `SyncEngine` - Pages through each selected stream, runs the child
//!   streams once per parent record, and writes Singer messages
//! - `SyncStats` - Counters reported at the end of a run
//!
//! Requests for a stream always go to that stream's own path. The query is
//! the paginator's base parameters overlaid with the query pairs of the
//! previous page's `next` link.

mod types;

pub use types::SyncStats;

use crate::catalog::Selection;
use crate::decode::{JsonDecoder, RecordDecoder};
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::output::MessageWriter;
use crate::pagination::{NextUrlPaginator, PaginationState, Paginator};
use crate::partition::Context;
use crate::state::StateManager;
use crate::streams::StreamDefinition;
use crate::template;
use crate::types::{JsonObject, JsonValue};
use std::io::Write;
use std::time::Instant;
use tracing::{debug, info};
use url::Url;

/// Sync engine for orchestrating data extraction
pub struct SyncEngine<W: Write> {
    /// HTTP client
    client: HttpClient,
    /// Bookmarks
    state: StateManager,
    /// Singer message sink
    writer: MessageWriter<W>,
    /// Record extraction
    decoder: Box<dyn RecordDecoder>,
    /// Page traversal
    paginator: Box<dyn Paginator>,
    /// Statistics
    stats: SyncStats,
}

impl<W: Write> SyncEngine<W> {
    /// Create an engine using the Census decoder and paginator
    pub fn new(client: HttpClient, state: StateManager, writer: MessageWriter<W>) -> Self {
        Self {
            client,
            state,
            writer,
            decoder: Box::new(JsonDecoder::census()),
            paginator: Box::new(NextUrlPaginator::census()),
            stats: SyncStats::default(),
        }
    }

    /// Replace the record decoder
    #[must_use]
    pub fn with_decoder(mut self, decoder: impl RecordDecoder + 'static) -> Self {
        self.decoder = Box::new(decoder);
        self
    }

    /// Replace the paginator
    #[must_use]
    pub fn with_paginator(mut self, paginator: impl Paginator + 'static) -> Self {
        self.paginator = Box::new(paginator);
        self
    }

    /// Get the state manager
    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// Get statistics
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Consume the engine, returning the message sink
    pub fn into_writer(self) -> MessageWriter<W> {
        self.writer
    }

    /// Sync every fetched stream in `streams`, parents first
    pub async fn sync_all(
        &mut self,
        streams: &[StreamDefinition],
        selection: &Selection,
    ) -> Result<SyncStats> {
        let start = Instant::now();

        for stream in streams.iter().filter(|s| !s.is_child()) {
            if !selection.is_fetched(&stream.name) {
                debug!(stream = %stream.name, "Stream not selected, skipping");
                continue;
            }

            self.write_schemas(stream, streams, selection)?;
            self.sync_stream(stream, streams, selection).await?;
            self.emit_state().await?;
        }

        self.emit_state().await?;
        self.writer.flush()?;

        self.stats.set_duration(start.elapsed().as_millis() as u64);
        info!(
            records = self.stats.records_synced,
            pages = self.stats.pages_fetched,
            partitions = self.stats.partitions_synced,
            duration_ms = self.stats.duration_ms,
            "Sync complete"
        );
        Ok(self.stats.clone())
    }

    /// Write SCHEMA messages for `stream` and its emitted descendants
    fn write_schemas(
        &mut self,
        stream: &StreamDefinition,
        streams: &[StreamDefinition],
        selection: &Selection,
    ) -> Result<()> {
        if selection.is_emitted(&stream.name) {
            self.writer.write_schema(stream)?;
        }
        for child in children_of(streams, &stream.name) {
            self.write_schemas(child, streams, selection)?;
        }
        Ok(())
    }

    /// Sync a top-level stream, fanning out to its fetched children after
    /// each page
    async fn sync_stream(
        &mut self,
        stream: &StreamDefinition,
        streams: &[StreamDefinition],
        selection: &Selection,
    ) -> Result<()> {
        let emit = selection.is_emitted(&stream.name);
        let children: Vec<&StreamDefinition> = children_of(streams, &stream.name)
            .filter(|child| selection.is_fetched(&child.name))
            .collect();
        info!(stream = %stream.name, "Syncing stream");

        let path = stream.path.clone();
        let request_url = Url::parse(&self.client.build_url(&path))?;
        let mut pagination = PaginationState::new();
        let mut written = 0usize;

        loop {
            let (body, records) = self.fetch_page(&stream.name, &path, &pagination).await?;
            let record_count = records.len();

            let mut contexts = Vec::new();
            for child in &children {
                if let Some(router) = &child.parent {
                    contexts.push((*child, router.partitions(&records)?));
                }
            }

            if emit {
                for record in records {
                    self.write_record(stream, None, record).await?;
                    written += 1;
                }
            }

            for (child, partitions) in contexts {
                for context in partitions {
                    self.sync_partition(child, &context).await?;
                }
            }

            let next = self
                .paginator
                .process_response(&body, &request_url, record_count, &mut pagination)?;
            if next.is_done() {
                break;
            }
        }

        self.stats.add_stream();
        info!(
            stream = %stream.name,
            records = written,
            pages = pagination.pages,
            "Finished stream"
        );
        Ok(())
    }

    /// Sync a child stream for one parent record's context
    async fn sync_partition(&mut self, stream: &StreamDefinition, context: &Context) -> Result<()> {
        debug!(stream = %stream.name, context = %context.id(), "Syncing partition");

        let path = template::render_path(&stream.path, context.as_object())?;
        let request_url = Url::parse(&self.client.build_url(&path))?;
        let mut pagination = PaginationState::new();

        loop {
            let (body, records) = self.fetch_page(&stream.name, &path, &pagination).await?;
            let record_count = records.len();

            for mut record in records {
                inject_context(&mut record, context);
                self.write_record(stream, Some(context), record).await?;
            }

            let next = self
                .paginator
                .process_response(&body, &request_url, record_count, &mut pagination)?;
            if next.is_done() {
                break;
            }
        }

        self.stats.add_partition();
        self.emit_state().await
    }

    /// Request one page of `path` and decode its records
    async fn fetch_page(
        &mut self,
        stream: &str,
        path: &str,
        pagination: &PaginationState,
    ) -> Result<(JsonValue, Vec<JsonObject>)> {
        let params = self.paginator.request_params(pagination);
        let body = self
            .client
            .get_json(path, RequestConfig::new().with_params(params))
            .await?;
        self.stats.add_page();

        let records = self.decoder.decode(&body)?;
        debug!(
            stream = %stream,
            page = pagination.pages + 1,
            records = records.len(),
            "Fetched page"
        );
        Ok((body, records))
    }

    async fn write_record(
        &mut self,
        stream: &StreamDefinition,
        context: Option<&Context>,
        record: JsonObject,
    ) -> Result<()> {
        if let Some(key) = &stream.replication_key {
            if let Some(value) = record.get(key) {
                self.state
                    .advance_bookmark(&stream.name, context, key, value)
                    .await;
            }
        }
        self.writer.write_record(stream, record)?;
        self.stats.add_record(&stream.name);
        Ok(())
    }

    async fn emit_state(&mut self) -> Result<()> {
        let value = self.state.to_value().await;
        self.writer.write_state(value)
    }
}

fn children_of<'a>(
    streams: &'a [StreamDefinition],
    parent: &'a str,
) -> impl Iterator<Item = &'a StreamDefinition> {
    streams
        .iter()
        .filter(move |s| s.parent_stream() == Some(parent))
}

/// Fill context keys the child record does not carry itself
fn inject_context(record: &mut JsonObject, context: &Context) {
    for (key, value) in context.iter() {
        if !record.contains_key(key) {
            record.insert(key.clone(), value.clone());
        }
    }
}
