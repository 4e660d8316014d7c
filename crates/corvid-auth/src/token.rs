//! Token retrieval capabilities.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

/// An opaque bearer token string.
pub type AccessToken = String;

/// A capability that produces an access token.
///
/// Two instances are typically held: one for initial retrieval and one for
/// refresh. Returning `None` means the source has no token to offer; the
/// resolver decides whether that is an error.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Retrieve a token, or `None` if the source has nothing.
    async fn token(&self) -> Option<AccessToken>;
}

/// Any async closure returning `Option<AccessToken>` is a token source.
#[async_trait]
impl<F, Fut> TokenSource for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Option<AccessToken>> + Send,
{
    async fn token(&self) -> Option<AccessToken> {
        (self)().await
    }
}

/// Shared token source for use across async contexts.
pub type SharedTokenSource = Arc<dyn TokenSource>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn closure_acts_as_token_source() {
        let source: SharedTokenSource = Arc::new(|| async { Some("abc".to_string()) });
        assert_eq!(source.token().await.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn closure_may_return_nothing() {
        let source: SharedTokenSource = Arc::new(|| async { None });
        assert!(source.token().await.is_none());
    }
}
