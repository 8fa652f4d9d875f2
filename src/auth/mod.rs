//! Authentication module
//!
//! Census accepts its API token as HTTP Basic credentials with the fixed
//! username `bearer`. `Authenticator` attaches those credentials to every
//! outgoing request.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, CENSUS_AUTH_USERNAME};
