/// Identity provider module
///
/// Defines the token endpoint seam used by the authenticator and the
/// Keycloak-compatible HTTP implementation of it.

use anyhow::Result;
use serde::Deserialize;

use crate::auth::credentials::Credentials;

pub mod keycloak;

/// Successful token endpoint response. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: String,
    /// lifetime in seconds, relative to the request
    pub expires_in: u64,
}

/// Exchange user credentials for an access token (resource-owner password
/// grant). Any `Err` is an authentication failure.
pub trait IdentityProvider: Send + Sync {
    fn request_token(
        &self,
        credentials: &Credentials,
    ) -> impl std::future::Future<Output = Result<TokenGrant>> + Send;
}
