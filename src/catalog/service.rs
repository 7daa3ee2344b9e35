//! Validation and CRUD orchestration on top of a [`ProductStore`].

use std::sync::Arc;

use crate::catalog::store::ProductStore;
use crate::catalog::types::{Product, ProductDraft, ProductFields};
use crate::error::CatalogError;

/// Checks drafts and runs catalog operations against the store. Cheap to
/// clone; clones share the store.
pub struct CatalogService<S> {
  store: Arc<S>,
}

impl<S: ProductStore> CatalogService<S> {
  pub fn new(store: S) -> Self {
    Self {
      store: Arc::new(store),
    }
  }

  /// Validate and persist a new product. The store assigns the id.
  pub fn create(&self, draft: ProductDraft) -> Result<Product, CatalogError> {
    let fields = validate(draft)?;
    Ok(self.store.insert(fields)?)
  }

  pub fn get(&self, id: &str) -> Result<Product, CatalogError> {
    self.store.get(id)?.ok_or(CatalogError::NotFound)
  }

  /// Whole-record replace: every field except the id is overwritten with the
  /// validated draft. There are no partial updates.
  pub fn update(&self, id: &str, draft: ProductDraft) -> Result<Product, CatalogError> {
    let fields = validate(draft)?;
    self.store.replace(id, fields)?.ok_or(CatalogError::NotFound)
  }

  /// Hard delete.
  pub fn remove(&self, id: &str) -> Result<(), CatalogError> {
    if self.store.delete(id)? {
      Ok(())
    } else {
      Err(CatalogError::NotFound)
    }
  }

  /// Every product, sorted ascending by price. The sort is stable, so equal
  /// prices keep the store's insertion order.
  pub fn list(&self) -> Result<Vec<Product>, CatalogError> {
    let mut products = self.store.get_all()?;
    products.sort_by(|a, b| a.price.total_cmp(&b.price));
    Ok(products)
  }
}

impl<S> Clone for CatalogService<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
    }
  }
}

/// Check required fields and normalize the rest. Name, description, and
/// category are trimmed; absent optional fields become empty strings. The
/// category is free text, never checked against a fixed set.
fn validate(draft: ProductDraft) -> Result<ProductFields, CatalogError> {
  let name = draft.name.as_deref().unwrap_or("").trim();
  if name.is_empty() {
    return Err(CatalogError::Validation("Product name is required".to_string()));
  }
  if name.chars().count() < 3 {
    return Err(CatalogError::Validation(
      "Product name must be at least 3 characters".to_string(),
    ));
  }

  let price = draft
    .price
    .ok_or_else(|| CatalogError::Validation("Price is required".to_string()))?;
  if !price.is_finite() || price <= 0.0 {
    return Err(CatalogError::Validation(
      "Price must be a positive number".to_string(),
    ));
  }

  Ok(ProductFields {
    name: name.to_string(),
    price,
    description: draft.description.map(|d| d.trim().to_string()).unwrap_or_default(),
    category: draft.category.map(|c| c.trim().to_string()).unwrap_or_default(),
  })
}
