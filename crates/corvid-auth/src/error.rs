//! Error types for authorization resolution.

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors raised while resolving an authorization header.
///
/// Callers are known to pattern-match on the message text, so the exact
/// wording of each failure is part of the contract and covered by tests.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Authorization was required but no usable token could be produced.
    #[error("{0}")]
    Unauthorized(String),
}

impl AuthError {
    /// The human-readable failure message.
    pub fn message(&self) -> &str {
        match self {
            AuthError::Unauthorized(message) => message,
        }
    }
}
