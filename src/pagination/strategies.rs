//! Pagination strategy implementations

use super::types::{NextPage, PaginationState, Paginator};
use crate::error::{Error, Result};
use crate::types::{is_falsy, StringMap};
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Default page size requested from Census
pub const DEFAULT_PAGE_SIZE: u32 = 1;

/// Next URL pagination (URL in response body)
///
/// Reads the continuation URL from a top-level field of the response body,
/// e.g. `{ "data": [...], "next": "https://app.getcensus.com/api/v1/syncs?page=2" }`.
#[derive(Debug, Clone)]
pub struct NextUrlPaginator {
    /// Field holding the next URL
    pub next_field: String,
    /// Value of the `order` parameter
    pub order: String,
    /// Value of the `per_page` parameter
    pub page_size: u32,
}

impl Default for NextUrlPaginator {
    fn default() -> Self {
        Self {
            next_field: "next".to_string(),
            order: "asc".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl NextUrlPaginator {
    /// Paginator for Census list endpoints
    pub fn census() -> Self {
        Self::default()
    }

    /// Set the page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    fn parse_token(&self, raw: &Value, request_url: &Url) -> Result<Url> {
        let Value::String(next) = raw else {
            return Err(Error::pagination(format!(
                "'{}' must be a URL string, got {raw}",
                self.next_field
            )));
        };

        // Relative links resolve against the page that returned them
        Url::parse(next).or_else(|_| request_url.join(next)).map_err(|e| {
            Error::pagination(format!(
                "'{}' is not a valid URL ({next}): {e}",
                self.next_field
            ))
        })
    }
}

impl Paginator for NextUrlPaginator {
    fn base_params(&self) -> StringMap {
        let mut params = StringMap::new();
        params.insert("order".to_string(), self.order.clone());
        params.insert("per_page".to_string(), self.page_size.to_string());
        params
    }

    fn process_response(
        &self,
        body: &Value,
        request_url: &Url,
        records_count: usize,
        state: &mut PaginationState,
    ) -> Result<NextPage> {
        state.add_page(records_count);

        let next = body.get(&self.next_field).unwrap_or(&Value::Null);
        if is_falsy(next) {
            debug!(
                "No '{}' link after page {}, pagination complete",
                self.next_field, state.pages
            );
            state.mark_done();
            return Ok(NextPage::Done);
        }

        let token = self.parse_token(next, request_url)?;
        if state.has_seen(&token) {
            return Err(Error::pagination(format!(
                "Loop detected: next page token {token} was already followed"
            )));
        }

        state.advance(token.clone());
        Ok(NextPage::Continue(token))
    }
}
