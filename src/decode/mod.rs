//! Response decoder module
//!
//! Census wraps every list response as `{"data": [...], "next": ...}`.
//! The decoder pulls the records out with a JSONPath expression.

mod decoders;

pub use decoders::{JsonDecoder, RecordDecoder, CENSUS_RECORDS_PATH};
