use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use tracing::debug;

use crate::auth::credentials::Credentials;
use crate::config::service::ProviderConfig;
use crate::provider::{IdentityProvider, TokenGrant};
use crate::utils::constants::GRANT_TYPE_PASSWORD;

/// Password-grant client for a Keycloak realm token endpoint.
#[derive(Debug, Clone)]
pub struct KeycloakProvider {
    token_url: String,
    client_id: String,
    client_secret: String,
    client: Client,
}

impl KeycloakProvider {
    pub fn new(cfg: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(cfg.timeout())
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self::with_client(cfg, client))
    }

    pub fn with_client(cfg: &ProviderConfig, client: Client) -> Self {
        Self {
            token_url: cfg.token_url(),
            client_id: cfg.client_id.clone(),
            client_secret: cfg.client_secret.clone(),
            client,
        }
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }
}

impl IdentityProvider for KeycloakProvider {
    async fn request_token(&self, credentials: &Credentials) -> Result<TokenGrant> {
        let form = [
            ("grant_type", GRANT_TYPE_PASSWORD),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ];

        debug!(url = %self.token_url, username = %credentials.username, "requesting token");
        let response = self
            .client
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .context("token request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("token endpoint returned {}: {}", status, body));
        }

        let body = response.text().await.context("failed to read token response")?;
        serde_json::from_str::<TokenGrant>(&body).context("malformed token response")
    }
}
