//! Error types shared by the store, the catalog service, and the HTTP layer.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Persistence failures. Never caused by request contents, so the HTTP layer
/// maps every variant to a 500.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("database error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("corrupt product record: {0}")]
  Codec(#[from] serde_json::Error),

  #[error("store I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("store lock poisoned")]
  Poisoned,
}

/// Catalog operation failures, each with a fixed HTTP status.
#[derive(Debug, Error)]
pub enum CatalogError {
  /// A required field is missing or malformed; the message names which.
  #[error("{0}")]
  Validation(String),

  /// No product with the requested id.
  #[error("Product not found")]
  NotFound,

  #[error(transparent)]
  Store(#[from] StoreError),
}

/// Every error response carries a `{"message": ...}` body.
impl ResponseError for CatalogError {
  fn status_code(&self) -> StatusCode {
    match self {
      CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
      CatalogError::NotFound => StatusCode::NOT_FOUND,
      CatalogError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    if let CatalogError::Store(source) = self {
      tracing::error!(error = %source, "store failure while handling request");
    }
    HttpResponse::build(self.status_code()).json(json!({ "message": self.to_string() }))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_validation_maps_to_400() {
    let err = CatalogError::Validation("Price is required".to_string());
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(err.to_string(), "Price is required");
  }

  #[test]
  fn test_not_found_maps_to_404() {
    let err = CatalogError::NotFound;
    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(err.to_string(), "Product not found");
  }

  #[test]
  fn test_store_maps_to_500() {
    let err = CatalogError::Store(StoreError::Poisoned);
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
  }
}
