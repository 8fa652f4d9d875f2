//! Output module
//!
//! Singer messages on stdout.
//!
//! # Overview
//!
//! This module provides:
//! - `Message` - SCHEMA, RECORD and STATE messages
//! - `MessageWriter` - JSON-lines writer with record conformance

mod messages;
mod writer;

pub use messages::Message;
pub use writer::MessageWriter;
