//! Stream schemas
//!
//! Declarative JSON schemas for the Census streams, plus the record checks
//! run before a RECORD message is written.
//!
//! # Features
//!
//! - **Builders**: nullable property shorthands (`integer()`, `datetime()`, ...)
//! - **Validation**: type and `date-time` format checks, reported not enforced
//! - **Conformance**: undeclared keys are dropped recursively

pub mod builders;
mod types;
mod validate;

pub use types::{AdditionalProperties, JsonSchema, JsonType, JsonTypeOrArray, SchemaProperty};
pub use validate::ValidationIssue;

#[cfg(test)]
mod tests;
