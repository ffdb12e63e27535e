//! Stockroom API Client
//!
//! The data-fetch layer for tabular views: takes a view's
//! [`PaginationController`] and fetches the matching page over HTTP.

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use crate::auth::AuthState;
use crate::inventory::{GoalProgress, InventorySummary, Product, Sale};
use crate::pagination::{Page, PaginationController};

/// HTTP client for a Stockroom API server
pub struct InventoryClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl InventoryClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Builder method: send `token` as a bearer credential
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL for a paged listing of `resource` in the view's current state
    pub fn listing_url(&self, resource: &str, view: &PaginationController) -> String {
        format!(
            "{}/api/v1/{}?{}",
            self.base_url,
            resource,
            view.to_query_parameters().to_query_string()
        )
    }

    /// Fetch the page of products the view is on
    pub async fn list_products(&self, view: &PaginationController) -> Result<Page<Product>, ClientError> {
        self.get_json(&self.listing_url("products", view)).await
    }

    /// Fetch the page of sales the view is on
    pub async fn list_sales(&self, view: &PaginationController) -> Result<Page<Sale>, ClientError> {
        self.get_json(&self.listing_url("sales", view)).await
    }

    pub async fn summary(&self) -> Result<InventorySummary, ClientError> {
        self.get_json(&format!("{}/api/v1/analytics/summary", self.base_url))
            .await
    }

    pub async fn goal(&self, metric: &str, target: f64) -> Result<GoalProgress, ClientError> {
        let url = format!(
            "{}/api/v1/analytics/goals?target={}&metric={}",
            self.base_url,
            target,
            urlencoding::encode(metric)
        );
        self.get_json(&url).await
    }

    /// Authentication state of this client's token
    pub async fn session(&self) -> Result<AuthState, ClientError> {
        #[derive(serde::Deserialize)]
        struct SessionBody {
            state: AuthState,
        }

        let body: SessionBody = self
            .get_json(&format!("{}/api/v1/session", self.base_url))
            .await?;
        Ok(body.state)
    }

    /// Check if the server is reachable and live
    pub async fn health_check(&self) -> Result<(), ClientError> {
        let url = format!("{}/health/live", self.base_url);
        let response = self.client.get(&url).send().await.map_err(classify)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ClientError::Unavailable)
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        tracing::debug!(url, "GET");
        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(classify)?;
        decode(response).await
    }
}

fn classify(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout
    } else if e.is_connect() {
        ClientError::Unavailable
    } else {
        ClientError::Request(e)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    if response.status().is_success() {
        return Ok(response.json().await?);
    }

    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    // Prefer the server's error message when the body is an error envelope
    let message = serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or(text);

    Err(ClientError::Api { status, message })
}

/// Client errors
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Request timeout")]
    Timeout,

    #[error("Server unavailable")]
    Unavailable,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}
