//! Tap configuration
//!
//! The only required setting is `api_token`. Config files are merged left to
//! right; the pseudo-path `ENV` layers `TAP_GETCENSUS_*` environment variables
//! on top of whatever was loaded so far.

use crate::error::{Error, Result, ResultExt};
use crate::types::{JsonObject, OptionStringExt};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Default Census API host
pub const DEFAULT_API_URL: &str = "https://app.getcensus.com";

/// Prefix of environment variables read for `--config ENV`
pub const ENV_PREFIX: &str = "TAP_GETCENSUS_";

/// Sentinel config path that means "read from the environment"
pub const ENV_CONFIG_SOURCE: &str = "ENV";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;
const DEFAULT_MAX_RETRIES: u32 = 5;

/// Settings recognised by the tap
#[derive(Clone, Serialize, Deserialize)]
pub struct TapConfig {
    /// Census API token, sent as the Basic auth password
    pub api_token: String,

    /// API host (scheme + authority, no path)
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Override for the `User-Agent` header
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Retries for transient HTTP failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

impl fmt::Debug for TapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TapConfig")
            .field("api_token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("user_agent", &self.user_agent)
            .field("request_timeout", &self.request_timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl TapConfig {
    /// Build a config with just a token and defaults for everything else
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            api_url: default_api_url(),
            user_agent: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Point the tap at a different host
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Parse and validate a config from a JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut obj) = value else {
            return Err(Error::config("Config must be a JSON object"));
        };
        // Unset settings may arrive as explicit nulls
        obj.retain(|_, v| !v.is_null());

        let has_token = obj
            .get("api_token")
            .and_then(Value::as_str)
            .is_some_and(|s| !s.trim().is_empty());
        if !has_token {
            return Err(Error::missing_field("api_token"));
        }

        let config: TapConfig = serde_json::from_value(Value::Object(obj))
            .map_err(|e| Error::config(format!("Invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a list of sources (`ENV` or JSON file paths)
    pub fn load<S: AsRef<str>>(sources: &[S]) -> Result<Self> {
        let merged = merge_sources(sources, |key| std::env::var(key).ok())?;
        Self::from_value(Value::Object(merged))
    }

    fn validate(&self) -> Result<()> {
        url::Url::parse(&self.api_url)
            .map_err(|e| Error::invalid_value("api_url", e.to_string()))?;
        if self.request_timeout == 0 {
            return Err(Error::invalid_value(
                "request_timeout",
                "must be greater than zero",
            ));
        }
        Ok(())
    }

    /// `User-Agent` header value
    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .none_if_empty()
            .unwrap_or_else(|| format!("{}/{}", crate::NAME, crate::VERSION))
    }

    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

/// Merge config sources left to right into one JSON object
pub fn merge_sources<S, F>(sources: &[S], env: F) -> Result<JsonObject>
where
    S: AsRef<str>,
    F: Fn(&str) -> Option<String>,
{
    let mut merged = JsonObject::new();

    for source in sources {
        let source = source.as_ref();
        if source == ENV_CONFIG_SOURCE {
            merged.extend(read_env(&env));
            continue;
        }

        let path = Path::new(source);
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: source.to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {source}"))?;
        let value: Value = serde_json::from_str(&contents)
            .map_err(|e| Error::config(format!("Invalid config JSON in {source}: {e}")))?;
        match value {
            Value::Object(map) => merged.extend(map),
            _ => {
                return Err(Error::config(format!(
                    "Config file {source} must contain a JSON object"
                )))
            }
        }
    }

    Ok(merged)
}

fn read_env<F: Fn(&str) -> Option<String>>(env: &F) -> JsonObject {
    let mut values = JsonObject::new();
    for (key, kind) in SETTINGS {
        let var = format!("{ENV_PREFIX}{}", key.to_uppercase());
        let Some(raw) = env(&var) else { continue };
        let value = match kind {
            SettingKind::String => Value::String(raw),
            SettingKind::Integer => match raw.trim().parse::<u64>() {
                Ok(n) => Value::from(n),
                Err(_) => Value::String(raw),
            },
        };
        values.insert((*key).to_string(), value);
    }
    values
}

#[derive(Debug, Clone, Copy)]
enum SettingKind {
    String,
    Integer,
}

const SETTINGS: &[(&str, SettingKind)] = &[
    ("api_token", SettingKind::String),
    ("api_url", SettingKind::String),
    ("user_agent", SettingKind::String),
    ("request_timeout", SettingKind::Integer),
    ("max_retries", SettingKind::Integer),
];

/// JSON schema describing the accepted settings
pub fn settings_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "api_token": {
                "type": ["string"],
                "description": "Auth token for getcensus.com API",
                "secret": true,
                "writeOnly": true
            },
            "api_url": {
                "type": ["string", "null"],
                "description": "Census API host",
                "default": DEFAULT_API_URL
            },
            "user_agent": {
                "type": ["string", "null"],
                "description": "User-Agent header sent with every request"
            },
            "request_timeout": {
                "type": ["integer", "null"],
                "description": "Per-request timeout in seconds",
                "default": DEFAULT_REQUEST_TIMEOUT_SECS
            },
            "max_retries": {
                "type": ["integer", "null"],
                "description": "Retries for transient HTTP failures",
                "default": DEFAULT_MAX_RETRIES
            }
        },
        "required": ["api_token"]
    })
}
