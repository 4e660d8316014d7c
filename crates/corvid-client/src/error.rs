//! Client error types.

use corvid_auth::AuthError;
use serde::{Deserialize, Serialize};

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A validation problem reported by the server for one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// The property that failed validation.
    pub property: String,
    /// The constraint that was violated.
    pub constraint: String,
    /// Human-readable description.
    pub message: String,
}

/// The uniform error shape surfaced for every failed call, regardless of
/// whether the failure came from the server or the transport.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status of the failure. 0 when the failure never produced a
    /// response (a pure transport error).
    pub status_code: u16,
    /// Summary in the form `"{status} {detail} <{METHOD} {url}>"`.
    pub message: String,
    /// Per-property validation issues, when the server reported any.
    pub errors: Vec<ValidationIssue>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Client error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The call failed; retries were exhausted or inapplicable.
    #[error("{0}")]
    Api(ApiError),

    /// Authorization could not be resolved before the request was sent.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Path placeholders left unresolved; the request was never sent.
    #[error("Missing required path parameter(s): {}", .0.join(", "))]
    MissingPathParams(Vec<String>),

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Plumbing-level HTTP error: building the client or decoding a success
    /// body. Failed calls themselves surface as [`Error::Api`].
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// The HTTP status equivalent of this error, when it has one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api(e) => Some(e.status_code),
            Error::Auth(_) => Some(401),
            Error::MissingPathParams(_) => Some(400),
            _ => None,
        }
    }

    /// Check if this is an authentication/authorization failure.
    pub fn is_auth_error(&self) -> bool {
        self.status_code() == Some(401)
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self.status_code(), Some(status) if status >= 500)
    }

    /// Check if the server signalled that this client must upgrade.
    pub fn is_upgrade_required(&self) -> bool {
        self.status_code() == Some(406)
    }
}

/// Error payload shape the Corvid API returns, as far as this client cares.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<Vec<ValidationIssue>>,
}
