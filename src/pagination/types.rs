//! Pagination types and traits

use crate::error::Result;
use crate::types::StringMap;
use serde_json::Value;
use std::collections::HashSet;
use url::Url;

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// Another page exists; its continuation URL is the token
    Continue(Url),
    /// No more pages
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue(_))
    }

    /// The continuation token, if any
    pub fn token(&self) -> Option<&Url> {
        match self {
            Self::Continue(url) => Some(url),
            Self::Done => None,
        }
    }
}

/// Tracks pagination state while iterating one stream partition
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Continuation token for the next request (`None` before the first page)
    pub token: Option<Url>,
    /// Pages processed so far
    pub pages: u32,
    /// Total records fetched so far
    pub total_fetched: u64,
    /// Is pagination complete?
    pub done: bool,
    /// Every token followed so far
    seen: HashSet<Url>,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.token = None;
        self.done = true;
    }

    /// Advance to the page behind `token`
    pub fn advance(&mut self, token: Url) {
        self.seen.insert(token.clone());
        self.token = Some(token);
    }

    /// Whether `token` was already followed in this sequence
    pub fn has_seen(&self, token: &Url) -> bool {
        self.seen.contains(token)
    }

    /// Record a processed page
    pub fn add_page(&mut self, records: usize) {
        self.pages += 1;
        self.total_fetched += records as u64;
    }
}

/// Core trait for pagination strategies
pub trait Paginator: Send + Sync {
    /// Parameters sent with every request, before any token overlay
    fn base_params(&self) -> StringMap;

    /// Parameters for the request described by `state`
    fn request_params(&self, state: &PaginationState) -> StringMap {
        overlay_params(self.base_params(), state.token.as_ref())
    }

    /// Inspect a page and decide whether (and where) to continue
    fn process_response(
        &self,
        body: &Value,
        request_url: &Url,
        records_count: usize,
        state: &mut PaginationState,
    ) -> Result<NextPage>;
}

/// Overlay the decoded query pairs of `token` on top of `base`
///
/// Pairs are applied in order, so a key repeated in the query string keeps
/// its last value, and any key shared with `base` takes the token's value.
pub fn overlay_params(mut base: StringMap, token: Option<&Url>) -> StringMap {
    if let Some(url) = token {
        for (key, value) in url.query_pairs() {
            base.insert(key.into_owned(), value.into_owned());
        }
    }
    base
}
