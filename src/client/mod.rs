//! HTTP client for the catalog API, plus a list-view driver that mirrors how
//! an interactive product list consumes it (debounced filters, immediate
//! pagination, stale-response protection).

pub mod list_view;

pub use list_view::{ListFilters, ListView, ListViewState, LOAD_ERROR_MESSAGE};

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::ErrorResponse;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("api error ({status}): {message}")]
    Api { status: StatusCode, message: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: i64,
    pub quantity: i64,
    pub description: Option<String>,
}

/// One page of list results, as returned by `GET /products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPage {
    pub page: i64,
    pub limit: i64,
    pub total: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
    pub data: Vec<Product>,
}

/// Fields for create and update requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub category: String,
    pub price: i64,
    pub quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub async fn list(
        &self,
        page: i64,
        limit: i64,
        filters: &ListFilters,
    ) -> Result<ProductPage, ClientError> {
        let mut query: Vec<(&str, String)> =
            vec![("page", page.to_string()), ("limit", limit.to_string())];
        if !filters.search.is_empty() {
            query.push(("search", filters.search.clone()));
        }
        if !filters.category.is_empty() {
            query.push(("category", filters.category.clone()));
        }
        if let Some(min) = filters.min_price {
            query.push(("minPrice", min.to_string()));
        }
        if let Some(max) = filters.max_price {
            query.push(("maxPrice", max.to_string()));
        }
        let response = self
            .http
            .get(format!("{}/products", self.base_url))
            .query(&query)
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn categories(&self) -> Result<Vec<String>, ClientError> {
        let response = self
            .http
            .get(format!("{}/products/categories", self.base_url))
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn get(&self, id: i64) -> Result<Product, ClientError> {
        let response = self
            .http
            .get(format!("{}/products/{id}", self.base_url))
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Creates a product and returns its id.
    pub async fn create(&self, draft: &ProductDraft) -> Result<i64, ClientError> {
        let response = self
            .http
            .post(format!("{}/products", self.base_url))
            .json(draft)
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn update(&self, id: i64, draft: &ProductDraft) -> Result<(), ClientError> {
        let response = self
            .http
            .put(format!("{}/products/{id}", self.base_url))
            .json(draft)
            .send()
            .await?;
        Self::parse::<serde_json::Value>(response).await?;
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(format!("{}/products/{id}", self.base_url))
            .send()
            .await?;
        Self::parse::<serde_json::Value>(response).await?;
        Ok(())
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
        };
        Err(ClientError::Api { status, message })
    }
}
