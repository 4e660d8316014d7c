//! Token claim decoding and expiry checks.
//!
//! Claim extraction is a capability ([`ClaimsDecoder`]) rather than a fixed
//! token format, so the resolver can be exercised with synthetic tokens. The
//! default decoder reads the payload segment of a JWT without verifying the
//! signature — validation is the server's job; the client only needs `exp`
//! to decide whether a refresh is worth attempting.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::Deserialize;

/// The claims this client cares about.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Claims {
    /// Expiry as seconds since the Unix epoch.
    pub exp: Option<u64>,
    /// Role claim, if the issuing server sets one. May be a string or a list.
    pub role: Option<serde_json::Value>,
}

/// A token that could not be decoded.
#[derive(Debug, thiserror::Error)]
#[error("invalid token: {0}")]
pub struct DecodeError(pub String);

/// Capability for extracting [`Claims`] from a raw token.
pub trait ClaimsDecoder: Send + Sync {
    /// Decode a token into its claims.
    fn decode(&self, token: &str) -> Result<Claims, DecodeError>;
}

/// Default decoder: parses the payload segment of a JWT.
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtDecoder;

impl ClaimsDecoder for JwtDecoder {
    fn decode(&self, token: &str) -> Result<Claims, DecodeError> {
        let payload = token
            .split('.')
            .nth(1)
            .ok_or_else(|| DecodeError("missing payload segment".to_string()))?;

        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|e| DecodeError(e.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| DecodeError(e.to_string()))
    }
}

/// Current wall-clock time as seconds since the Unix epoch.
pub(crate) fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Check whether a token has expired.
///
/// Fails safe: an undecodable token, or one without an `exp` claim, counts
/// as expired.
pub fn is_expired(decoder: &dyn ClaimsDecoder, token: &str) -> bool {
    let Ok(claims) = decoder.decode(token) else {
        return true;
    };

    match claims.exp {
        Some(exp) => exp < now_secs(),
        None => true,
    }
}

/// Build an unsigned JWT carrying the given claims, for tests.
#[cfg(test)]
pub(crate) fn encode_test_token(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.sig")
}
