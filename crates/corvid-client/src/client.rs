//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use url::Url;

use corvid_auth::{Authorizer, TokenSource};

use crate::api::{ArticlesApi, StatusApi, UsersApi};
use crate::config::{Environment, resolve_base_url};
use crate::error::{ApiError, Error, Result};
use crate::executor::RequestExecutor;
use crate::interceptor::{ErrorHook, NormalizerStage, RefreshTokenStage, UpgradeHook, UpgradeRequiredStage};

/// Corvid API client.
///
/// Provides typed access to the generated operation surface, with token
/// refresh, reset retry, and error normalization handled on every call.
///
/// # Example
///
/// ```no_run
/// use corvid_client::{CorvidClient, Environment};
///
/// # async fn example() -> corvid_client::Result<()> {
/// let client = CorvidClient::builder()
///     .environment(Environment::Production)
///     .get_access_token(|| async { Some("eyJ...".to_string()) })
///     .build()?;
///
/// let article = client.articles().get("hello-world").await?;
/// println!("{}", article.title);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CorvidClient {
    /// Shared executor (cloning the client is cheap).
    executor: Arc<RequestExecutor>,
}

impl CorvidClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        self.executor.base_url()
    }

    /// Access the users API.
    pub fn users(&self) -> UsersApi {
        UsersApi::new(self.clone())
    }

    /// Access the articles API.
    pub fn articles(&self) -> ArticlesApi {
        ArticlesApi::new(self.clone())
    }

    /// Access the status API.
    pub fn status(&self) -> StatusApi {
        StatusApi::new(self.clone())
    }

    /// Get access to the executor (for API implementations).
    pub(crate) fn executor(&self) -> &RequestExecutor {
        &self.executor
    }
}

impl std::fmt::Debug for CorvidClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorvidClient")
            .field("base_url", self.base_url())
            .finish()
    }
}

/// Builder for creating a [`CorvidClient`].
pub struct ClientBuilder {
    environment: Option<Environment>,
    base_url: Option<String>,
    get_access_token: Option<Arc<dyn TokenSource>>,
    refresh_access_token: Option<Arc<dyn TokenSource>>,
    on_error: Option<ErrorHook>,
    on_upgrade_required: Option<UpgradeHook>,
    debug: bool,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            environment: None,
            base_url: None,
            get_access_token: None,
            refresh_access_token: None,
            on_error: None,
            on_upgrade_required: None,
            debug: false,
            timeout: None,
            user_agent: None,
        }
    }

    /// Target a well-known deployment environment.
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Override the base URL (wins over [`environment`](Self::environment)).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Hook that returns the current access token.
    pub fn get_access_token(mut self, source: impl TokenSource + 'static) -> Self {
        self.get_access_token = Some(Arc::new(source));
        self
    }

    /// Hook that produces a fresh access token when the current one is
    /// missing or expired.
    pub fn refresh_access_token(mut self, source: impl TokenSource + 'static) -> Self {
        self.refresh_access_token = Some(Arc::new(source));
        self
    }

    /// Hook that receives normalized errors selected for logging. Without
    /// one, server errors go to `tracing::error!`.
    pub fn on_error(mut self, hook: impl Fn(&ApiError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(hook));
        self
    }

    /// Hook fired when the server answers 406, signalling that this client
    /// version is no longer acceptable.
    pub fn on_upgrade_required(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_upgrade_required = Some(Arc::new(hook));
        self
    }

    /// Log every failed call, not just server errors.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the request timeout (delegated to the transport).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<CorvidClient> {
        let base_url = resolve_base_url(self.environment, self.base_url.as_deref())?;

        // Parse and normalize so joins keep the full base path.
        let mut base_url = Url::parse(&base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let accept = format!(
            "application/vnd.corvid+json; version={}",
            env!("CARGO_PKG_VERSION")
        );
        let accept = HeaderValue::from_str(&accept)
            .map_err(|_| Error::Config("invalid accept header".to_string()))?;
        headers.insert(ACCEPT, accept);

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("corvid-client/{}", env!("CARGO_PKG_VERSION")));

        let mut http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent);

        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }

        let http = http.build()?;

        let authorizer = Authorizer::new(
            self.get_access_token,
            self.refresh_access_token.clone(),
        );

        // Stage order is fixed: refresh, reset, normalize, upgrade.
        let executor = RequestExecutor::new(
            http,
            base_url,
            authorizer,
            RefreshTokenStage::new(self.refresh_access_token),
            NormalizerStage::new(self.on_error, self.debug),
            UpgradeRequiredStage::new(self.on_upgrade_required),
        );

        Ok(CorvidClient {
            executor: Arc::new(executor),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
