//! Client-held copy of the product list with derived filtered/sorted views.
//!
//! Search and sort never re-fetch: the last successful full fetch stays in
//! memory and every interaction recomputes the view from it. Mutations go to
//! the server first and the cache then refreshes, so the view only ever shows
//! what the server confirmed. Nothing is patched locally.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use tracing::warn;

use crate::catalog::types::{Product, ProductDraft};
use crate::client::api::{ApiClient, ApiError};

/// Lifecycle of the cached list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheState {
  /// No fetch attempted yet.
  Idle,
  /// A fetch is in flight.
  Loading,
  /// The last fetch succeeded.
  Ready,
  /// The last fetch failed; the previous contents are kept and another
  /// `refresh()` retries.
  Error(String),
}

impl CacheState {
  pub fn is_ready(&self) -> bool {
    matches!(self, CacheState::Ready)
  }

  pub fn is_error(&self) -> bool {
    matches!(self, CacheState::Error(_))
  }
}

/// Price sort direction for the derived view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
  /// Cheapest first
  Asc,
  /// Most expensive first
  Desc,
}

/// Recompute a display list: case-insensitive substring filter across name,
/// description, and category (a record matches if ANY field contains the
/// trimmed query), then an optional stable price sort. `None` keeps the
/// filtered rows in their incoming order.
pub fn filter_and_sort(products: &[Product], query: &str, order: Option<SortOrder>) -> Vec<Product> {
  let query = query.trim().to_lowercase();

  let mut matched: Vec<Product> = products
    .iter()
    .filter(|p| query.is_empty() || matches_query(p, &query))
    .cloned()
    .collect();

  match order {
    Some(SortOrder::Asc) => matched.sort_by(|a, b| a.price.total_cmp(&b.price)),
    Some(SortOrder::Desc) => matched.sort_by(|a, b| b.price.total_cmp(&a.price)),
    None => {}
  }

  matched
}

fn matches_query(product: &Product, query: &str) -> bool {
  product.name.to_lowercase().contains(query)
    || product.description.to_lowercase().contains(query)
    || product.category.to_lowercase().contains(query)
}

/// In-memory product list plus its derived view, fed by an [`ApiClient`].
///
/// Driven from a single task; every operation borrows `&mut self` for the
/// whole round-trip. Independent caches pointed at the same server each keep
/// their own copy, and a cache learns of other writers only on `refresh()`.
pub struct ProductCache {
  api: ApiClient,
  all: Vec<Product>,
  view: Vec<Product>,
  state: CacheState,
  refreshed_at: Option<DateTime<Utc>>,
}

impl ProductCache {
  pub fn new(api: ApiClient) -> Self {
    Self {
      api,
      all: Vec::new(),
      view: Vec::new(),
      state: CacheState::Idle,
      refreshed_at: None,
    }
  }

  /// The current derived view.
  pub fn products(&self) -> &[Product] {
    &self.view
  }

  pub fn state(&self) -> &CacheState {
    &self.state
  }

  /// When the list was last fetched successfully.
  pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
    self.refreshed_at
  }

  /// Fetch the full list and reset both the cached list and the view to it,
  /// sorted ascending by price. On failure the previous contents stay
  /// untouched and the cache enters `Error`; call again to retry.
  pub async fn refresh(&mut self) -> Result<(), ApiError> {
    self.state = CacheState::Loading;
    match self.api.list().await {
      Ok(mut products) => {
        products.sort_by(|a, b| a.price.total_cmp(&b.price));
        self.all = products.clone();
        self.view = products;
        self.state = CacheState::Ready;
        self.refreshed_at = Some(Utc::now());
        Ok(())
      }
      Err(err) => {
        self.state = CacheState::Error(err.to_string());
        Err(err)
      }
    }
  }

  /// Recompute the view from the cached list. Never fetches.
  pub fn apply_filter(&mut self, query: &str, order: Option<SortOrder>) {
    self.view = filter_and_sort(&self.all, query, order);
  }

  /// Create on the server, then refresh so the view reflects what was stored.
  pub async fn create(&mut self, draft: ProductDraft) -> Result<Product, ApiError> {
    let product = self.api.create(&draft).await?;
    self.refresh_after_mutation("create").await;
    Ok(product)
  }

  /// Whole-record update on the server, then refresh.
  pub async fn update(&mut self, id: &str, draft: ProductDraft) -> Result<Product, ApiError> {
    let product = self.api.update(id, &draft).await?;
    self.refresh_after_mutation("update").await;
    Ok(product)
  }

  /// Delete on the server, then refresh. Returns the server's message.
  pub async fn remove(&mut self, id: &str) -> Result<String, ApiError> {
    let message = self.api.delete(id).await?;
    self.refresh_after_mutation("delete").await;
    Ok(message)
  }

  /// The mutation itself already succeeded; a failed refresh only leaves the
  /// cache stale, with the error state for the caller to surface.
  async fn refresh_after_mutation(&mut self, operation: &str) {
    if let Err(err) = self.refresh().await {
      warn!(operation, error = %err, "refresh after mutation failed, cache is stale");
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::service::CatalogService;
  use crate::catalog::store::MemoryStore;
  use crate::config::ServerConfig;
  use crate::server;

  fn product(id: &str, name: &str, price: f64, description: &str, category: &str) -> Product {
    Product {
      id: id.to_string(),
      name: name.to_string(),
      price,
      description: description.to_string(),
      category: category.to_string(),
    }
  }

  fn shop() -> Vec<Product> {
    vec![
      product("1", "Running Shoe", 50.0, "Lightweight trainer", "Sports"),
      product("2", "Shoe Rack", 30.0, "Holds 12 pairs", "Home & Garden"),
      product("3", "Hat", 10.0, "Wool, one size", "Clothing"),
    ]
  }

  #[test]
  fn test_filter_matches_name_case_insensitively() {
    let view = filter_and_sort(&shop(), "SHOE", Some(SortOrder::Desc));
    let names: Vec<&str> = view.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Running Shoe", "Shoe Rack"]);
  }

  #[test]
  fn test_filter_matches_description_and_category() {
    let by_description = filter_and_sort(&shop(), "pairs", None);
    assert_eq!(by_description.len(), 1);
    assert_eq!(by_description[0].name, "Shoe Rack");

    let by_category = filter_and_sort(&shop(), "clothing", None);
    assert_eq!(by_category.len(), 1);
    assert_eq!(by_category[0].name, "Hat");
  }

  #[test]
  fn test_query_is_trimmed() {
    let view = filter_and_sort(&shop(), "  hat  ", None);
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].name, "Hat");
  }

  #[test]
  fn test_empty_query_keeps_everything() {
    let view = filter_and_sort(&shop(), "", Some(SortOrder::Asc));
    let prices: Vec<f64> = view.iter().map(|p| p.price).collect();
    assert_eq!(prices, [10.0, 30.0, 50.0]);
  }

  #[test]
  fn test_no_order_keeps_incoming_order() {
    let view = filter_and_sort(&shop(), "", None);
    let names: Vec<&str> = view.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Running Shoe", "Shoe Rack", "Hat"]);
  }

  #[test]
  fn test_no_match_is_empty() {
    assert!(filter_and_sort(&shop(), "zeppelin", Some(SortOrder::Asc)).is_empty());
  }

  #[test]
  fn test_sort_is_stable_for_equal_prices() {
    let products = vec![
      product("1", "First", 5.0, "", ""),
      product("2", "Second", 5.0, "", ""),
      product("3", "Third", 5.0, "", ""),
    ];
    let view = filter_and_sort(&products, "", Some(SortOrder::Asc));
    let names: Vec<&str> = view.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["First", "Second", "Third"]);
  }

  async fn spawn_api() -> (actix_web::dev::ServerHandle, ApiClient) {
    let service = CatalogService::new(MemoryStore::new());
    let config = ServerConfig {
      port: 0,
      ..Default::default()
    };
    let (server, addr) = server::bind(service, &config).unwrap();
    let handle = server.handle();
    actix_web::rt::spawn(server);
    (handle, ApiClient::new(&format!("http://{addr}")).unwrap())
  }

  fn draft(name: &str, price: f64) -> ProductDraft {
    ProductDraft {
      name: Some(name.to_string()),
      price: Some(price),
      ..Default::default()
    }
  }

  #[actix_web::test]
  async fn test_refresh_loads_sorted_and_marks_ready() {
    let (handle, api) = spawn_api().await;
    let mut cache = ProductCache::new(api);
    assert_eq!(*cache.state(), CacheState::Idle);

    for (name, price) in [("Mid", 30.0), ("Cheap", 10.0), ("Dear", 50.0)] {
      cache.create(draft(name, price)).await.unwrap();
    }

    assert!(cache.state().is_ready());
    assert!(cache.refreshed_at().is_some());
    let names: Vec<&str> = cache.products().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Cheap", "Mid", "Dear"]);

    handle.stop(true).await;
  }

  #[actix_web::test]
  async fn test_fresh_cache_sees_existing_products_on_refresh() {
    let (handle, api) = spawn_api().await;
    let mut writer = ProductCache::new(api.clone());
    for (name, price) in [("Mid", 30.0), ("Cheap", 10.0)] {
      writer.create(draft(name, price)).await.unwrap();
    }

    let mut reader = ProductCache::new(api);
    reader.refresh().await.unwrap();
    reader.apply_filter("", Some(SortOrder::Asc));
    let names: Vec<&str> = reader.products().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Cheap", "Mid"]);

    handle.stop(true).await;
  }

  #[actix_web::test]
  async fn test_mutations_refresh_the_view() {
    let (handle, api) = spawn_api().await;
    let mut cache = ProductCache::new(api);

    let created = cache.create(draft("Hat", 10.0)).await.unwrap();
    assert_eq!(cache.products().len(), 1);

    cache.update(&created.id, draft("Cap", 12.0)).await.unwrap();
    assert_eq!(cache.products()[0].name, "Cap");
    assert_eq!(cache.products()[0].price, 12.0);

    let message = cache.remove(&created.id).await.unwrap();
    assert_eq!(message, "Product deleted successfully");
    assert!(cache.products().is_empty());

    handle.stop(true).await;
  }

  #[actix_web::test]
  async fn test_filter_never_refetches() {
    let (handle, api) = spawn_api().await;
    let mut cache = ProductCache::new(api);
    for (name, price) in [("Running Shoe", 50.0), ("Shoe Rack", 30.0), ("Hat", 10.0)] {
      cache.create(draft(name, price)).await.unwrap();
    }

    // Stop the server; filtering must still work from the cached list.
    handle.stop(true).await;

    cache.apply_filter("shoe", Some(SortOrder::Desc));
    let names: Vec<&str> = cache.products().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Running Shoe", "Shoe Rack"]);

    cache.apply_filter("", None);
    assert_eq!(cache.products().len(), 3);
  }

  #[actix_web::test]
  async fn test_failed_refresh_keeps_previous_contents() {
    let (handle, api) = spawn_api().await;
    let mut cache = ProductCache::new(api);
    cache.create(draft("Hat", 10.0)).await.unwrap();
    let refreshed_at = cache.refreshed_at();

    handle.stop(true).await;

    let result = cache.refresh().await;
    assert!(result.is_err());
    assert!(cache.state().is_error());
    assert_eq!(cache.products().len(), 1);
    assert_eq!(cache.refreshed_at(), refreshed_at);
  }

  #[actix_web::test]
  async fn test_rejected_mutation_surfaces_server_message() {
    let (handle, api) = spawn_api().await;
    let mut cache = ProductCache::new(api);
    cache.create(draft("Hat", 10.0)).await.unwrap();

    let err = cache.create(draft("ab", 5.0)).await.unwrap_err();
    match err {
      ApiError::Api { status, message } => {
        assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
        assert_eq!(message, "Product name must be at least 3 characters");
      }
      other => panic!("expected API error, got {other:?}"),
    }
    // the failed create must not have touched the catalog
    assert_eq!(cache.products().len(), 1);

    handle.stop(true).await;
  }
}
