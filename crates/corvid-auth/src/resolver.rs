//! Per-request authorization resolution.

use std::sync::Arc;

use crate::claims::{ClaimsDecoder, JwtDecoder, is_expired};
use crate::error::{AuthError, Result};
use crate::token::{AccessToken, SharedTokenSource};

const NO_GETTER: &str =
    "Authorization is required but no `get_access_token` hook was configured.";
const NO_REFRESHER: &str = "Authorization is required but there is no valid access token and no `refresh_access_token` hook was configured.";
const REFRESHER_RETURNED_NOTHING: &str = "Authorization is required but there is no valid access token and nothing was returned from `refresh_access_token`.";
const REFRESHED_TOKEN_EXPIRED: &str = "Authorization is required but the access token has expired and `refresh_access_token` also returned an expired token.";

/// Decides, per request, whether a bearer token is attached.
///
/// Holds the two caller-supplied token hooks. Unsecured routes never carry
/// authorization; secure routes must end up with a non-expired token, with at
/// most one sequential refresh per resolution. Concurrent resolutions do not
/// coordinate — each may trigger its own refresh.
pub struct Authorizer {
    get_access_token: Option<SharedTokenSource>,
    refresh_access_token: Option<SharedTokenSource>,
    decoder: Arc<dyn ClaimsDecoder>,
}

impl std::fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorizer")
            .field("get_access_token", &self.get_access_token.is_some())
            .field("refresh_access_token", &self.refresh_access_token.is_some())
            .finish()
    }
}

impl Authorizer {
    /// Create a resolver with the default JWT claims decoder.
    pub fn new(
        get_access_token: Option<SharedTokenSource>,
        refresh_access_token: Option<SharedTokenSource>,
    ) -> Self {
        Self::with_decoder(get_access_token, refresh_access_token, Arc::new(JwtDecoder))
    }

    /// Create a resolver with a custom claims decoder.
    pub fn with_decoder(
        get_access_token: Option<SharedTokenSource>,
        refresh_access_token: Option<SharedTokenSource>,
        decoder: Arc<dyn ClaimsDecoder>,
    ) -> Self {
        Self {
            get_access_token,
            refresh_access_token,
            decoder,
        }
    }

    /// Resolve the `Authorization` header value for one request.
    ///
    /// Returns `None` when the route is not secure (a token may exist and may
    /// even be expired — it is simply not attached). For secure routes the
    /// current token is used if valid, refreshed once if missing or expired,
    /// and the request fails with [`AuthError::Unauthorized`] otherwise.
    pub async fn authorization_header(&self, secure: bool) -> Result<Option<String>> {
        if secure && self.get_access_token.is_none() {
            return Err(AuthError::Unauthorized(NO_GETTER.to_string()));
        }

        let current = match &self.get_access_token {
            Some(source) => source.token().await.filter(|t| !t.is_empty()),
            None => None,
        };

        if !secure {
            return Ok(None);
        }

        let mut token = match current {
            Some(token) => token,
            None => self.refreshed_token().await?,
        };

        if is_expired(self.decoder.as_ref(), &token) {
            tracing::debug!("access token expired, refreshing");
            token = self.refreshed_token().await?;

            if is_expired(self.decoder.as_ref(), &token) {
                return Err(AuthError::Unauthorized(REFRESHED_TOKEN_EXPIRED.to_string()));
            }
        }

        Ok(Some(format!("Bearer {token}")))
    }

    async fn refreshed_token(&self) -> Result<AccessToken> {
        let refresh = self
            .refresh_access_token
            .as_ref()
            .ok_or_else(|| AuthError::Unauthorized(NO_REFRESHER.to_string()))?;

        refresh
            .token()
            .await
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::Unauthorized(REFRESHER_RETURNED_NOTHING.to_string()))
    }
}
