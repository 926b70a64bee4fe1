//! Client for the storefront address API.
//!
//! Endpoints (relative to `api.base_url`):
//!
//! | operation      | request                          |
//! |----------------|----------------------------------|
//! | list           | `GET    /addresses`              |
//! | create         | `POST   /addresses`              |
//! | update         | `PUT    /addresses/{id}`         |
//! | remove         | `DELETE /addresses/{id}`         |
//! | set default    | `PATCH  /addresses/{id}/default` |
//! | seed from user | `POST   /addresses/seed`         |

use address_form::{AddressDraft, AddressDto};
use async_trait::async_trait;
use reqwest::{
    Client, Method, RequestBuilder, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderValue},
};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::ApiConfig;

pub type AddressId = i64;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server answered {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid API token")]
    InvalidToken,
}

/// Address record as stored by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAddress {
    pub id: AddressId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub zipcode: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub address1: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub address2: String,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_default: bool,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}

impl StoredAddress {
    /// `name`, falling back to the backend-side `receiver`.
    pub fn receiver_name(&self) -> &str {
        if self.name.trim().is_empty() {
            self.receiver.as_deref().unwrap_or("")
        } else {
            &self.name
        }
    }

    /// Initial form values for editing this address.
    pub fn to_draft(&self) -> AddressDraft {
        AddressDraft {
            name: self.receiver_name().to_string(),
            phone: self.phone.clone(),
            zipcode: self.zipcode.clone(),
            address1: self.address1.clone(),
            address2: self.address2.clone(),
        }
        .normalized()
    }
}

#[async_trait]
pub trait AddressApi: Send + Sync {
    async fn list(&self) -> Result<Vec<StoredAddress>, ApiError>;
    async fn create(&self, dto: &AddressDto) -> Result<StoredAddress, ApiError>;
    async fn update(&self, id: AddressId, dto: &AddressDto) -> Result<StoredAddress, ApiError>;
    async fn remove(&self, id: AddressId) -> Result<(), ApiError>;
    async fn set_default(&self, id: AddressId) -> Result<StoredAddress, ApiError>;
    /// Create a default address from the account profile. `None` if the service had nothing.
    async fn seed(&self) -> Result<Option<StoredAddress>, ApiError>;
}

pub struct HttpAddressApi {
    client: Client,
    base_url: String,
    token: Option<HeaderValue>,
}

impl HttpAddressApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        let token = config
            .bearer_token()
            .map(|t| HeaderValue::from_str(&format!("Bearer {t}")))
            .transpose()
            .map_err(|_| ApiError::InvalidToken)?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, self.url(path))
            .header(ACCEPT, "application/json");
        match &self.token {
            Some(token) => builder.header(AUTHORIZATION, token.clone()),
            None => builder,
        }
    }

    /// Send and return the body text of a 2xx response.
    async fn send(&self, builder: RequestBuilder) -> Result<String, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status { status, body });
        }
        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(builder).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl AddressApi for HttpAddressApi {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<StoredAddress>, ApiError> {
        let body = self.send(self.request(Method::GET, "/addresses")).await?;
        // Anything but an array counts as an empty book.
        let value: serde_json::Value = serde_json::from_str(&body)?;
        if !value.is_array() {
            debug!("address list response was not an array");
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(value)?)
    }

    #[instrument(skip(self, dto))]
    async fn create(&self, dto: &AddressDto) -> Result<StoredAddress, ApiError> {
        self.send_json(self.request(Method::POST, "/addresses").json(dto))
            .await
    }

    #[instrument(skip(self, dto))]
    async fn update(&self, id: AddressId, dto: &AddressDto) -> Result<StoredAddress, ApiError> {
        self.send_json(
            self.request(Method::PUT, &format!("/addresses/{id}"))
                .json(dto),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn remove(&self, id: AddressId) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, &format!("/addresses/{id}")))
            .await
            .map(|_| ())
    }

    #[instrument(skip(self))]
    async fn set_default(&self, id: AddressId) -> Result<StoredAddress, ApiError> {
        self.send_json(self.request(Method::PATCH, &format!("/addresses/{id}/default")))
            .await
    }

    #[instrument(skip(self))]
    async fn seed(&self) -> Result<Option<StoredAddress>, ApiError> {
        let body = self.send(self.request(Method::POST, "/addresses/seed")).await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        Ok(serde_json::from_str(&body)?)
    }
}
