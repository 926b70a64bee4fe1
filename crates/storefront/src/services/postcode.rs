use address_form::PostcodeResult;
use async_trait::async_trait;
use reqwest::Client;
use tracing::instrument;

use super::api::ApiError;
use crate::config::ApiConfig;

/// Backend of the postcode lookup popup.
#[async_trait]
pub trait PostcodeSearch: Send + Sync {
    /// Check that the lookup service answers. Run once at start-up.
    async fn probe(&self) -> Result<(), ApiError>;
    async fn search(&self, query: &str) -> Result<Vec<PostcodeResult>, ApiError>;
}

pub struct HttpPostcodeSearch {
    client: Client,
    endpoint: String,
}

impl HttpPostcodeSearch {
    pub fn new(endpoint: impl Into<String>, api: &ApiConfig) -> Result<Self, ApiError> {
        Ok(Self {
            client: Client::builder().timeout(api.timeout()).build()?,
            endpoint: endpoint.into(),
        })
    }

    async fn get(&self, query: &str) -> Result<String, ApiError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("query", query)])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status { status, body });
        }
        Ok(body)
    }
}

#[async_trait]
impl PostcodeSearch for HttpPostcodeSearch {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn probe(&self) -> Result<(), ApiError> {
        self.get("").await.map(|_| ())
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<PostcodeResult>, ApiError> {
        let body = self.get(query).await?;
        Ok(serde_json::from_str(&body)?)
    }
}
