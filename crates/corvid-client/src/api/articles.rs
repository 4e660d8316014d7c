//! Articles API.

use reqwest::Method;
use serde::Serialize;

use crate::client::CorvidClient;
use crate::error::Result;
use crate::operation::{CallOptions, OperationDescriptor};
use crate::types::{Article, CreateArticleRequest, ListArticlesResponse};

const LIST_ARTICLES: OperationDescriptor = OperationDescriptor {
    endpoint: "/articles",
    method: Method::GET,
    secure: false,
};

const GET_ARTICLE: OperationDescriptor = OperationDescriptor {
    endpoint: "/articles/{slug}",
    method: Method::GET,
    secure: false,
};

const CREATE_ARTICLE: OperationDescriptor = OperationDescriptor {
    endpoint: "/articles",
    method: Method::POST,
    secure: true,
};

const DELETE_ARTICLE: OperationDescriptor = OperationDescriptor {
    endpoint: "/articles/{slug}",
    method: Method::DELETE,
    secure: true,
};

/// Query parameters for listing articles.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListArticlesQuery {
    /// Filter by author username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Filter by tags (any match). Serialized as repeated `tags[]` keys.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Page offset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

/// Articles API client.
///
/// Note: reading articles does not require authentication; writing does.
pub struct ArticlesApi {
    client: CorvidClient,
}

impl ArticlesApi {
    pub(crate) fn new(client: CorvidClient) -> Self {
        Self { client }
    }

    /// List published articles.
    pub async fn list(&self, query: &ListArticlesQuery) -> Result<ListArticlesResponse> {
        self.client
            .executor()
            .execute(&LIST_ARTICLES, CallOptions::new().merge_query(query)?)
            .await
    }

    /// Get an article by slug.
    pub async fn get(&self, slug: &str) -> Result<Article> {
        self.client
            .executor()
            .execute(&GET_ARTICLE, CallOptions::new().param("slug", slug))
            .await
    }

    /// Create an article.
    pub async fn create(&self, request: &CreateArticleRequest) -> Result<Article> {
        self.client
            .executor()
            .execute(
                &CREATE_ARTICLE,
                CallOptions::new().data(serde_json::to_value(request)?),
            )
            .await
    }

    /// Delete an article.
    pub async fn delete(&self, slug: &str) -> Result<()> {
        self.client
            .executor()
            .execute_empty(&DELETE_ARTICLE, CallOptions::new().param("slug", slug))
            .await
    }
}
