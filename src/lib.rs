//! # Token Gateway Library
//!
//! Exchanges Basic credentials for OAuth2 password-grant access tokens and
//! caches them in memory, so repeated requests with the same credentials skip
//! the identity provider round trip.
//!
//! Modules:
//! - `auth` — credential extraction, the caching authenticator, diagnostics
//! - `cache` — token cache implementation
//! - `provider` — identity provider seam and the Keycloak client
//! - `config` — service configuration, loading and validation
//! - `server` — HTTP surface (protected API, metrics)

pub mod auth;
pub mod cache;
pub mod config;
pub mod helpers;
pub mod observability;
pub mod provider;
pub mod server;
pub mod utils;

#[cfg(test)]
pub mod tests;


pub use crate::auth::authenticator::Authenticator;
pub use crate::auth::credentials::Credentials;
pub use crate::auth::error::AuthError;
pub use crate::config::service::ServiceConfig;
