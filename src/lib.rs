//! # tap-getcensus
//!
//! Singer tap extracting syncs, sync runs, sources, destinations and their
//! objects from the Census management API.
//!
//! ## Features
//!
//! - **Basic Auth**: API token sent as the password of user `bearer`
//! - **HATEOAS Pagination**: follows the `next` link of every page
//! - **Parent/Child Streams**: one child request sequence per parent record
//! - **Incremental Bookmarks**: Singer state with per-partition bookmarks
//! - **Singer Output**: SCHEMA, RECORD and STATE messages on stdout
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tap_getcensus::connector::{CensusConnector, Connector};
//! use tap_getcensus::output::MessageWriter;
//! use tap_getcensus::state::StateManager;
//! use tap_getcensus::{Result, TapConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let connector = CensusConnector::new(TapConfig::new("secret-token"));
//!
//!     let status = connector.check().await?;
//!     let catalog = connector.discover().await?;
//!
//!     let writer = MessageWriter::new(std::io::stdout());
//!     connector.read(Some(&catalog), StateManager::in_memory(), writer).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Connector Interface                        │
//! │  spec() → About   check() → Status   discover() → Catalog       │
//! │  read(catalog, state) → SCHEMA / RECORD / STATE lines           │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │   Auth   │   HTTP    │   Paginate    │ Partition │   Output    │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ Basic    │ GET       │ next URL      │ Parent id │ Singer JSON │
//! │          │ Retry     │ order=asc     │ context   │ Conformance │
//! │          │ Rate Limit│ per_page=1    │           │ Bookmarks   │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the tap
pub mod error;

/// Common types and type aliases
pub mod types;

/// Tap settings
pub mod config;

/// Basic authentication
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Next-link pagination
pub mod pagination;

/// Parent-to-child context derivation
pub mod partition;

/// Response decoders
pub mod decode;

/// Path templates
pub mod template;

/// Stream schemas, validation and conformance
pub mod schema;

/// Census stream definitions
pub mod streams;

/// Bookmarks
pub mod state;

/// Singer catalog and stream selection
pub mod catalog;

/// Singer message output
pub mod output;

/// Main execution engine
pub mod engine;

/// Connector trait and the Census tap
pub mod connector;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::TapConfig;
pub use error::{Error, Result};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
