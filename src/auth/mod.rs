//! Credential extraction and cached token authentication.

pub mod authenticator;
pub mod credentials;
pub mod diagnostics;
pub mod error;
pub mod inflight;
