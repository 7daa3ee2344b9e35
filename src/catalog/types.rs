use serde::{Deserialize, Serialize};

/// A catalog product, exactly as stored and served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  /// Store-assigned, opaque to clients.
  pub id: String,
  pub name: String,
  pub price: f64,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub category: String,
}

/// Raw create/update body. Every field is optional on the wire; presence is
/// checked by the service, not the deserializer, so a missing name comes back
/// as a validation message rather than a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductDraft {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub price: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub category: Option<String>,
}

/// Validated, normalized product fields, ready to persist. Only the service
/// constructs these.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
  pub name: String,
  pub price: f64,
  pub description: String,
  pub category: String,
}

impl ProductFields {
  /// Attach an id, producing the full record.
  pub fn into_product(self, id: String) -> Product {
    Product {
      id,
      name: self.name,
      price: self.price,
      description: self.description,
      category: self.category,
    }
  }
}
