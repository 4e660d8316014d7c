//! Request execution.
//!
//! Turns an [`OperationDescriptor`] plus per-call options into one HTTP
//! call: path substitution, body/query attachment, authorization, and the
//! attempt loop that drives the interceptor stages. Retries are invisible to
//! the caller — a successful retry returns as if the first attempt had
//! succeeded.

use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use corvid_auth::Authorizer;

use crate::error::{Error, ErrorBody, Result};
use crate::interceptor::{
    Attempt, ConnectionResetStage, Failure, NormalizerStage, RefreshTokenStage,
    UpgradeRequiredStage,
};
use crate::operation::{CallOptions, OperationDescriptor, populate_endpoint};
use crate::query::serialize_query;

pub(crate) struct RequestExecutor {
    http: reqwest::Client,
    base_url: Url,
    authorizer: Authorizer,
    refresh_stage: RefreshTokenStage,
    reset_stage: ConnectionResetStage,
    normalizer: NormalizerStage,
    upgrade_stage: UpgradeRequiredStage,
}

impl RequestExecutor {
    pub(crate) fn new(
        http: reqwest::Client,
        base_url: Url,
        authorizer: Authorizer,
        refresh_stage: RefreshTokenStage,
        normalizer: NormalizerStage,
        upgrade_stage: UpgradeRequiredStage,
    ) -> Self {
        Self {
            http,
            base_url,
            authorizer,
            refresh_stage,
            reset_stage: ConnectionResetStage,
            normalizer,
            upgrade_stage,
        }
    }

    pub(crate) fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Execute an operation and deserialize the response body.
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        operation: &OperationDescriptor,
        options: CallOptions,
    ) -> Result<T> {
        let response = self.run(operation, options).await?;
        response.json().await.map_err(Error::Http)
    }

    /// Execute an operation, discarding the response body.
    pub(crate) async fn execute_empty(
        &self,
        operation: &OperationDescriptor,
        options: CallOptions,
    ) -> Result<()> {
        self.run(operation, options).await.map(drop)
    }

    async fn run(
        &self,
        operation: &OperationDescriptor,
        options: CallOptions,
    ) -> Result<reqwest::Response> {
        let endpoint = populate_endpoint(operation.endpoint, &options.params)?;

        let mut url = self.base_url.join(endpoint.trim_start_matches('/'))?;
        // The display form goes into normalized error messages: no query.
        let display_url = url.as_str().to_string();

        if let Some(query) = serialize_query(&options.query) {
            url.set_query(Some(&query));
        }

        let body = options
            .data
            .as_ref()
            .filter(|data| matches!(data, Value::Object(map) if !map.is_empty()));

        let mut authorization = self
            .authorizer
            .authorization_header(operation.secure)
            .await?;

        let mut attempt = Attempt::default();

        loop {
            let mut request = self.http.request(operation.method.clone(), url.clone());

            if let Some(authorization) = &authorization {
                request = request.header(AUTHORIZATION, authorization.as_str());
            }

            if let Some(body) = body {
                request = request.json(body);
            }

            tracing::debug!(target: "corvid::http", "{} {display_url}", operation.method);

            match request.send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    let status = response.status();
                    let error_body: ErrorBody = response.json().await.unwrap_or_default();
                    let failure = Failure::Status {
                        status,
                        body: error_body,
                    };

                    if let Some(refreshed) = self
                        .refresh_stage
                        .consider(&failure, authorization.is_some(), &mut attempt)
                        .await
                    {
                        authorization = Some(refreshed);
                        continue;
                    }

                    return Err(self.finish(&operation.method, &display_url, failure));
                }
                Err(error) => {
                    if self.reset_stage.should_retry(&error, &mut attempt) {
                        tracing::debug!(target: "corvid::http", "connection reset, retrying once");
                        continue;
                    }

                    return Err(self.finish(
                        &operation.method,
                        &display_url,
                        Failure::Transport(error),
                    ));
                }
            }
        }
    }

    /// Run the terminal stages: normalize, signal, surface.
    fn finish(&self, method: &reqwest::Method, display_url: &str, failure: Failure) -> Error {
        let error = self.normalizer.normalize(method, display_url, failure);
        self.upgrade_stage.observe(&error);
        Error::Api(error)
    }
}
