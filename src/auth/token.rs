//! Static token authentication
//!
//! GitLab tokens don't expire mid-session from our point of view, so a single
//! provider covers access tokens, OAuth2 tokens, and CI job tokens.

use crate::auth::provider::{AuthHeader, AuthProvider};
use crate::config::AuthType;
use crate::error::AuthError;
use crate::util::SecretString;
use async_trait::async_trait;

/// Prefix GitLab puts on CI/CD job tokens
const JOB_TOKEN_PREFIX: &str = "glcbt-";

/// Token authentication provider
#[derive(Debug, Clone)]
pub struct TokenProvider {
    token: SecretString,
    kind: AuthType,
}

impl TokenProvider {
    /// Create a provider, detecting the kind from the token when not given
    pub fn new(token: SecretString, kind: Option<AuthType>) -> Result<Self, AuthError> {
        if token.expose_secret().trim().is_empty() {
            return Err(AuthError::InvalidToken);
        }

        let kind = kind.unwrap_or_else(|| detect_kind(token.expose_secret()));
        Ok(Self { token, kind })
    }

    pub fn kind(&self) -> AuthType {
        self.kind
    }
}

fn detect_kind(token: &str) -> AuthType {
    if token.starts_with(JOB_TOKEN_PREFIX) {
        AuthType::Job
    } else {
        AuthType::Pat
    }
}

#[async_trait]
impl AuthProvider for TokenProvider {
    async fn get_auth_header(&self) -> Result<AuthHeader, AuthError> {
        let token = self.token.clone();
        Ok(match self.kind {
            AuthType::Pat => AuthHeader::PrivateToken(token),
            AuthType::Oauth => AuthHeader::Bearer(token),
            AuthType::Job => AuthHeader::JobToken(token),
        })
    }

    fn auth_type(&self) -> &'static str {
        match self.kind {
            AuthType::Pat => "Personal Access Token",
            AuthType::Oauth => "OAuth2 Bearer Token",
            AuthType::Job => "CI Job Token",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token() {
        let result = TokenProvider::new(SecretString::new("  "), None);
        assert!(matches!(result.unwrap_err(), AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn test_private_token_header() {
        let provider = TokenProvider::new(SecretString::new("glpat-xxxx"), None).unwrap();
        let header = provider.get_auth_header().await.unwrap();

        assert_eq!(header.header_name(), "PRIVATE-TOKEN");
        assert_eq!(header.header_value(), "glpat-xxxx");
        assert!(!format!("{:?}", header).contains("glpat-xxxx"));
    }

    #[tokio::test]
    async fn test_oauth_header() {
        let provider =
            TokenProvider::new(SecretString::new("ya29.abc"), Some(AuthType::Oauth)).unwrap();
        let header = provider.get_auth_header().await.unwrap();

        assert_eq!(header.header_name(), "Authorization");
        assert_eq!(header.header_value(), "Bearer ya29.abc");
    }

    #[tokio::test]
    async fn test_job_token_detected() {
        let provider = TokenProvider::new(SecretString::new("glcbt-64_abc"), None).unwrap();
        assert_eq!(provider.kind(), AuthType::Job);
        let header = provider.get_auth_header().await.unwrap();
        assert_eq!(header.header_name(), "JOB-TOKEN");
    }
}
