//! REST handlers: thin serialization shims over the catalog service.

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::catalog::service::CatalogService;
use crate::catalog::store::ProductStore;
use crate::catalog::types::ProductDraft;
use crate::error::CatalogError;

/// GET / — liveness line.
pub async fn api_root() -> HttpResponse {
  HttpResponse::Ok().body("Product catalog API is running")
}

/// GET /api/products — every product, ascending by price.
pub async fn list_products<S: ProductStore + 'static>(
  service: web::Data<CatalogService<S>>,
) -> Result<HttpResponse, CatalogError> {
  let products = service.list()?;
  Ok(HttpResponse::Ok().json(products))
}

/// GET /api/products/{id}
pub async fn get_product<S: ProductStore + 'static>(
  service: web::Data<CatalogService<S>>,
  path: web::Path<String>,
) -> Result<HttpResponse, CatalogError> {
  let product = service.get(&path.into_inner())?;
  Ok(HttpResponse::Ok().json(product))
}

/// POST /api/products — 201 with the stored record, id included.
pub async fn create_product<S: ProductStore + 'static>(
  service: web::Data<CatalogService<S>>,
  draft: web::Json<ProductDraft>,
) -> Result<HttpResponse, CatalogError> {
  let product = service.create(draft.into_inner())?;
  tracing::info!(id = %product.id, "product created");
  Ok(HttpResponse::Created().json(product))
}

/// PUT /api/products/{id} — whole-record replace.
pub async fn update_product<S: ProductStore + 'static>(
  service: web::Data<CatalogService<S>>,
  path: web::Path<String>,
  draft: web::Json<ProductDraft>,
) -> Result<HttpResponse, CatalogError> {
  let product = service.update(&path.into_inner(), draft.into_inner())?;
  Ok(HttpResponse::Ok().json(product))
}

/// DELETE /api/products/{id}
pub async fn delete_product<S: ProductStore + 'static>(
  service: web::Data<CatalogService<S>>,
  path: web::Path<String>,
) -> Result<HttpResponse, CatalogError> {
  let id = path.into_inner();
  service.remove(&id)?;
  tracing::info!(%id, "product deleted");
  Ok(HttpResponse::Ok().json(json!({ "message": "Product deleted successfully" })))
}
