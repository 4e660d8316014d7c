//! HTTP client SDK for the Corvid content platform API.
//!
//! This crate provides the runtime half of the generated Corvid client: a
//! typed operation surface bound to a request pipeline that handles token
//! lifecycle, transparent retries, and error normalization.
//!
//! Every call runs through the same fixed pipeline:
//!
//! 1. **Authorization** — secure operations resolve a bearer token through
//!    the caller-supplied hooks, refreshing once if the token is missing or
//!    expired ([`corvid_auth::Authorizer`]).
//! 2. **Refresh retry** — a 401 on a request that carried authorization is
//!    retried exactly once with a freshly refreshed token.
//! 3. **Reset retry** — a connection-reset transport failure is retried
//!    exactly once.
//! 4. **Normalization** — any remaining failure is converted into the
//!    uniform [`ApiError`] shape (`{status_code, message, errors}`) and
//!    raised; server errors are logged.
//! 5. **Upgrade signal** — a 406 additionally fires the
//!    `on_upgrade_required` hook before the error surfaces.
//!
//! # Example
//!
//! ```no_run
//! use corvid_client::{CorvidClient, Environment};
//!
//! # async fn example() -> corvid_client::Result<()> {
//! let client = CorvidClient::builder()
//!     .environment(Environment::Production)
//!     .get_access_token(|| async { load_token_from_storage() })
//!     .refresh_access_token(|| async { renew_token_somehow().await })
//!     .on_upgrade_required(|| eprintln!("please update this app"))
//!     .build()?;
//!
//! // Public read, no token attached.
//! let articles = client.articles().list(&Default::default()).await?;
//!
//! // Secure call, bearer token resolved and refreshed as needed.
//! let me = client.users().me().await?;
//! # Ok(())
//! # }
//! # fn load_token_from_storage() -> Option<String> { None }
//! # async fn renew_token_somehow() -> Option<String> { None }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod operation;
pub mod types;

mod executor;
mod interceptor;
mod query;

pub use api::{ArticlesApi, ListArticlesQuery, ListUsersQuery, StatusApi, UsersApi};
pub use client::{ClientBuilder, CorvidClient};
pub use config::Environment;
pub use error::{ApiError, Error, Result, ValidationIssue};
pub use interceptor::{ErrorHook, UpgradeHook};
pub use operation::{CallOptions, OperationDescriptor};
pub use types::*;

// Re-export the auth capability types callers implement and match on.
pub use corvid_auth::{AccessToken, AuthError, SharedTokenSource, TokenSource};
