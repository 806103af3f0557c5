use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use crate::config::settings::SettingsConfig;
use crate::utils::constants::{DEFAULT_PROVIDER_TIMEOUT_MS, TOKEN_ENDPOINT_PATH};


/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub settings: SettingsConfig,
    pub provider: ProviderConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// ================================
/// Identity provider
/// ================================
#[derive(Deserialize, Clone)]
pub struct ProviderConfig {
    /// e.g. `https://keycloak.example.com/` (trailing slash optional)
    pub auth_server_url: String,
    pub realm: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl ProviderConfig {
    /// `{auth_server_url}/realms/{realm}/protocol/openid-connect/token`
    pub fn token_url(&self) -> String {
        format!(
            "{}/realms/{}/{}",
            self.auth_server_url.trim_end_matches('/'),
            self.realm,
            TOKEN_ENDPOINT_PATH
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("auth_server_url", &self.auth_server_url)
            .field("realm", &self.realm)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// ================================
/// Token cache
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CacheConfig {
    /// serialize authentication attempts per cache key
    #[serde(default)]
    pub single_flight: bool,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_PROVIDER_TIMEOUT_MS
}
