use thiserror::Error;

/// Outcome surfaced to the HTTP layer when no token can be produced.
///
/// Provider-side detail is logged where the failure happens and never
/// carried in this type.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing credentials")]
    MissingCredentials,
    #[error("authentication failed")]
    AuthFailure,
}

/// Raised only by the log-only inspection of cached tokens.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiagnosticError {
    #[error("cached token cannot be decoded: {0}")]
    MalformedCachedToken(String),
}
