//! State management module
//!
//! Bookmark tracking for incremental streams.
//!
//! # Overview
//!
//! The state module provides:
//! - `State` - Singer bookmarks document with per-partition entries
//! - `StateManager` - Shared state loaded from `--state`
//! - `compare_bookmarks` - Ordering used to keep the highest bookmark

mod manager;
mod types;

pub use manager::StateManager;
pub use types::{compare_bookmarks, Bookmark, PartitionBookmark, State, StreamBookmark};
