//! Auth configuration types

use crate::error::{Error, Result};
use std::fmt;

/// Username Census expects alongside the API token
pub const CENSUS_AUTH_USERNAME: &str = "bearer";

/// Authentication configuration
#[derive(Clone, Default)]
pub enum AuthConfig {
    /// No authentication
    #[default]
    None,

    /// HTTP Basic authentication
    Basic {
        /// Username
        username: String,
        /// Password
        password: String,
    },
}

impl AuthConfig {
    /// Basic credentials for a Census API token
    pub fn census(api_token: impl Into<String>) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.trim().is_empty() {
            return Err(Error::auth("API token is empty"));
        }
        Ok(Self::Basic {
            username: CENSUS_AUTH_USERNAME.to_string(),
            password: api_token,
        })
    }

    /// Check whether credentials are configured
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}
