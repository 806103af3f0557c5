//! Shared constants and invariants

pub const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_CONFIG_PATH: &str = "token-gateway.yaml";

// Identity provider
pub const TOKEN_ENDPOINT_PATH: &str = "protocol/openid-connect/token";
pub const GRANT_TYPE_PASSWORD: &str = "password";

// HTTP surface
pub const PROTECTED_API_PATH: &str = "/api/protected";
pub const MSG_MISSING_CREDENTIALS: &str = "Missing Authorization Header";
pub const MSG_AUTH_FAILED: &str = "Authentication failed";
pub const MSG_AUTHENTICATED: &str = "Hello Authenticated API User!";
