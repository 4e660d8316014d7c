//! Status API.

use reqwest::Method;

use crate::client::CorvidClient;
use crate::error::Result;
use crate::operation::{CallOptions, OperationDescriptor};
use crate::types::StatusResponse;

const GET_STATUS: OperationDescriptor = OperationDescriptor {
    endpoint: "/status",
    method: Method::GET,
    secure: false,
};

/// Status API client.
///
/// Note: status endpoints don't require authentication.
pub struct StatusApi {
    client: CorvidClient,
}

impl StatusApi {
    pub(crate) fn new(client: CorvidClient) -> Self {
        Self { client }
    }

    /// Fetch the service status.
    pub async fn check(&self) -> Result<StatusResponse> {
        self.client
            .executor()
            .execute(&GET_STATUS, CallOptions::new())
            .await
    }

    /// Simple connectivity check - returns true if the service is reachable.
    pub async fn is_healthy(&self) -> bool {
        self.check().await.is_ok()
    }
}
