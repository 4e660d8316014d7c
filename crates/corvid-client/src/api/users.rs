//! Users API.

use reqwest::Method;
use serde::Serialize;

use crate::client::CorvidClient;
use crate::error::Result;
use crate::operation::{CallOptions, OperationDescriptor};
use crate::types::{ListUsersResponse, UpdateUserRequest, User};

const GET_USER: OperationDescriptor = OperationDescriptor {
    endpoint: "/users/{id}",
    method: Method::GET,
    secure: true,
};

const GET_CURRENT_USER: OperationDescriptor = OperationDescriptor {
    endpoint: "/users/me",
    method: Method::GET,
    secure: true,
};

const LIST_USERS: OperationDescriptor = OperationDescriptor {
    endpoint: "/users",
    method: Method::GET,
    secure: true,
};

const UPDATE_USER: OperationDescriptor = OperationDescriptor {
    endpoint: "/users/{id}",
    method: Method::PATCH,
    secure: true,
};

const DELETE_USER: OperationDescriptor = OperationDescriptor {
    endpoint: "/users/{id}",
    method: Method::DELETE,
    secure: true,
};

/// Query parameters for listing users.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListUsersQuery {
    /// Filter by role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Page offset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

/// Users API client.
pub struct UsersApi {
    client: CorvidClient,
}

impl UsersApi {
    pub(crate) fn new(client: CorvidClient) -> Self {
        Self { client }
    }

    /// Get a user by ID.
    pub async fn get(&self, id: u64) -> Result<User> {
        self.client
            .executor()
            .execute(&GET_USER, CallOptions::new().param("id", id))
            .await
    }

    /// Get the authenticated user.
    pub async fn me(&self) -> Result<User> {
        self.client
            .executor()
            .execute(&GET_CURRENT_USER, CallOptions::new())
            .await
    }

    /// List users.
    pub async fn list(&self, query: &ListUsersQuery) -> Result<ListUsersResponse> {
        self.client
            .executor()
            .execute(&LIST_USERS, CallOptions::new().merge_query(query)?)
            .await
    }

    /// Update a user profile.
    pub async fn update(&self, id: u64, request: &UpdateUserRequest) -> Result<User> {
        self.client
            .executor()
            .execute(
                &UPDATE_USER,
                CallOptions::new()
                    .param("id", id)
                    .data(serde_json::to_value(request)?),
            )
            .await
    }

    /// Delete a user.
    pub async fn delete(&self, id: u64) -> Result<()> {
        self.client
            .executor()
            .execute_empty(&DELETE_USER, CallOptions::new().param("id", id))
            .await
    }
}
