use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use url::Url;

use crate::catalog::types::{Product, ProductDraft};

/// Client-side failures: API error responses or transport problems.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The API answered with a non-success status; `message` is the server's.
  #[error("{message}")]
  Api { status: StatusCode, message: String },

  #[error("request failed: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("invalid API URL: {0}")]
  BadUrl(#[from] url::ParseError),
}

/// `{"message": ...}` body, used by error responses and delete confirmations.
#[derive(Debug, Deserialize)]
struct ApiMessage {
  message: String,
}

/// Thin wrapper over the catalog endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
  http: reqwest::Client,
  base_url: Url,
}

impl ApiClient {
  /// `base_url` is the server root (e.g. `http://localhost:5000`); the
  /// `/api/products` prefix is appended per call.
  pub fn new(base_url: &str) -> Result<Self, ApiError> {
    Ok(Self {
      http: reqwest::Client::new(),
      base_url: Url::parse(base_url)?,
    })
  }

  /// GET /api/products
  pub async fn list(&self) -> Result<Vec<Product>, ApiError> {
    let response = self.http.get(self.collection_url()?).send().await?;
    Self::read_json(response).await
  }

  /// GET /api/products/{id}
  pub async fn get(&self, id: &str) -> Result<Product, ApiError> {
    let response = self.http.get(self.record_url(id)?).send().await?;
    Self::read_json(response).await
  }

  /// POST /api/products
  pub async fn create(&self, draft: &ProductDraft) -> Result<Product, ApiError> {
    let response = self.http.post(self.collection_url()?).json(draft).send().await?;
    Self::read_json(response).await
  }

  /// PUT /api/products/{id}
  pub async fn update(&self, id: &str, draft: &ProductDraft) -> Result<Product, ApiError> {
    let response = self.http.put(self.record_url(id)?).json(draft).send().await?;
    Self::read_json(response).await
  }

  /// DELETE /api/products/{id} — returns the server's confirmation message.
  pub async fn delete(&self, id: &str) -> Result<String, ApiError> {
    let response = self.http.delete(self.record_url(id)?).send().await?;
    let body: ApiMessage = Self::read_json(response).await?;
    Ok(body.message)
  }

  fn collection_url(&self) -> Result<Url, ApiError> {
    Ok(self.base_url.join("/api/products")?)
  }

  fn record_url(&self, id: &str) -> Result<Url, ApiError> {
    Ok(self.base_url.join(&format!("/api/products/{id}"))?)
  }

  /// Deserialize a success body, or surface the API's `message` for errors.
  async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
      return Ok(response.json().await?);
    }

    let message = match response.json::<ApiMessage>().await {
      Ok(body) => body.message,
      Err(_) => status.canonical_reason().unwrap_or("request failed").to_string(),
    };
    Err(ApiError::Api { status, message })
  }
}
