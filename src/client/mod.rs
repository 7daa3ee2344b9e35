//! Client side: the HTTP API wrapper and the in-memory product cache that
//! backs search and sort without re-fetching.

pub mod api;
pub mod cache;

/// Categories offered as suggestions when adding or editing a product. Purely
/// advisory: the server stores any category string as-is.
pub const SUGGESTED_CATEGORIES: &[&str] = &[
  "Electronics",
  "Clothing",
  "Books",
  "Home & Garden",
  "Sports",
  "Beauty",
  "Toys",
  "Automotive",
  "Health",
  "Other",
];
