//! Authentication module
//!
//! Provides the credential header attached to every GitLab API request.

pub mod provider;
pub mod token;

pub use provider::{AuthHeader, AuthProvider, BoxedAuthProvider};
pub use token::TokenProvider;

use crate::config::GitLabConfig;
use crate::error::AuthError;

/// Create an auth provider from configuration
pub fn create_auth_provider(config: &GitLabConfig) -> Result<BoxedAuthProvider, AuthError> {
    let token = config.token.clone().ok_or(AuthError::NotConfigured)?;
    Ok(Box::new(TokenProvider::new(token, config.auth_type)?))
}
