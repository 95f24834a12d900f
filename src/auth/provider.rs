//! Authentication provider trait
//!
//! Every GitLab request carries exactly one credential header. Providers decide
//! which header and what value.

use crate::error::AuthError;
use crate::util::SecretString;
// async_trait required for dyn-compatibility with Box<dyn AuthProvider>
use async_trait::async_trait;

/// Authentication provider trait
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Header to attach to the next request
    async fn get_auth_header(&self) -> Result<AuthHeader, AuthError>;

    /// Description of the auth method (for logging)
    fn auth_type(&self) -> &'static str;
}

/// Authentication header to use with requests
#[derive(Debug, Clone)]
pub enum AuthHeader {
    /// `Authorization: Bearer <token>` (OAuth2)
    Bearer(SecretString),
    /// `PRIVATE-TOKEN: <token>` (personal, project, or group access token)
    PrivateToken(SecretString),
    /// `JOB-TOKEN: <token>` (CI/CD job token)
    JobToken(SecretString),
}

impl AuthHeader {
    /// Get the header name for this auth type
    pub fn header_name(&self) -> &'static str {
        match self {
            AuthHeader::Bearer(_) => "Authorization",
            AuthHeader::PrivateToken(_) => "PRIVATE-TOKEN",
            AuthHeader::JobToken(_) => "JOB-TOKEN",
        }
    }

    /// Get the header value for this auth type
    pub fn header_value(&self) -> String {
        match self {
            AuthHeader::Bearer(token) => format!("Bearer {}", token.expose_secret()),
            AuthHeader::PrivateToken(token) | AuthHeader::JobToken(token) => {
                token.expose_secret().to_string()
            }
        }
    }
}

/// Box type alias for auth providers
pub type BoxedAuthProvider = Box<dyn AuthProvider>;
