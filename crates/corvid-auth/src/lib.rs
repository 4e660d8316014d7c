//! Access token lifecycle for the Corvid API client.
//!
//! The client never acquires credentials itself. Callers hand it two optional
//! hooks — one that returns the current access token and one that produces a
//! fresh token when the current one is missing or expired — and this crate
//! decides, per request, whether an `Authorization` header is attached.
//!
//! # Components
//!
//! - [`token`] — the [`TokenSource`] capability trait; any async closure
//!   returning `Option<AccessToken>` qualifies
//! - [`claims`] — token claim decoding and expiry checks
//! - [`resolver`] — the [`Authorizer`], which turns a route's security flag
//!   plus the configured hooks into a header value or an error
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use corvid_auth::Authorizer;
//!
//! # async fn example() -> corvid_auth::Result<()> {
//! let authorizer = Authorizer::new(
//!     Some(Arc::new(|| async { Some("eyJ...".to_string()) })),
//!     None,
//! );
//!
//! // Secure route: resolves to `Some("Bearer eyJ...")` while the token is valid.
//! let header = authorizer.authorization_header(true).await?;
//! assert!(header.is_some());
//! # Ok(())
//! # }
//! ```

pub mod claims;
pub mod error;
pub mod resolver;
pub mod token;

pub use claims::{Claims, ClaimsDecoder, DecodeError, JwtDecoder};
pub use error::{AuthError, Result};
pub use resolver::Authorizer;
pub use token::{AccessToken, SharedTokenSource, TokenSource};
