//! HTTP client module
//!
//! Executes the tap's GET requests. Streams and paginators never retry;
//! transient failures (429, 5xx, timeouts, connection errors) are retried
//! here with backoff, and a token bucket keeps request rates polite.

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
