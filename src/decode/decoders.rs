//! Decoder implementations

use crate::error::{Error, Result};
use crate::types::JsonObject;
use serde_json::Value;

/// Where Census list endpoints put their records
pub const CENSUS_RECORDS_PATH: &str = "$.data[*]";

/// Trait for extracting records from a parsed response body
pub trait RecordDecoder: Send + Sync {
    /// Extract the records contained in a response body
    fn decode(&self, body: &Value) -> Result<Vec<JsonObject>>;
}

/// JSON decoder with optional record path extraction
#[derive(Debug, Clone, Default)]
pub struct JsonDecoder {
    /// JSONPath to extract records
    record_path: Option<String>,
}

impl JsonDecoder {
    /// Create a decoder that treats the whole body as the record set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a JSON decoder with a record path
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            record_path: Some(path.into()),
        }
    }

    /// Decoder for Census list responses
    pub fn census() -> Self {
        Self::with_path(CENSUS_RECORDS_PATH)
    }

    /// The configured record path
    pub fn record_path(&self) -> Option<&str> {
        self.record_path.as_deref()
    }

    fn extract(&self, value: &Value) -> Result<Vec<Value>> {
        match &self.record_path {
            Some(path) => extract_with_jsonpath(value, path),
            None => match value {
                Value::Array(arr) => Ok(arr.clone()),
                Value::Null => Ok(vec![]),
                other => Ok(vec![other.clone()]),
            },
        }
    }
}

impl RecordDecoder for JsonDecoder {
    fn decode(&self, body: &Value) -> Result<Vec<JsonObject>> {
        let path = self.record_path.as_deref().unwrap_or("$");
        self.extract(body)?
            .into_iter()
            .enumerate()
            .map(|(index, value)| match value {
                Value::Object(record) => Ok(record),
                other => Err(Error::RecordExtraction {
                    path: path.to_string(),
                    message: format!("record {index} is not an object: {other}"),
                }),
            })
            .collect()
    }
}

fn extract_with_jsonpath(value: &Value, path: &str) -> Result<Vec<Value>> {
    use jsonpath_rust::JsonPath;

    let jp = JsonPath::try_from(path).map_err(|e| Error::JsonPath {
        message: format!("Invalid JSONPath: {e}"),
    })?;

    match jp.find(value) {
        Value::Array(arr) => Ok(arr),
        Value::Null => Ok(vec![]),
        other => Ok(vec![other]),
    }
}
