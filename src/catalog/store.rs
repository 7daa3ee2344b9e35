//! Durable keyed storage for product records.
//!
//! Each product is persisted as one JSON document keyed by its generated id,
//! the way a document-store collection would hold it. SQLite gives atomic
//! per-record writes; nothing above it adds transactions.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::catalog::types::{Product, ProductFields};
use crate::error::StoreError;

/// Keyed storage for [`Product`] records.
///
/// Implementations guarantee atomic per-record writes and nothing more: no
/// ordering (callers sort), no uniqueness beyond the id, no multi-record
/// transactions.
pub trait ProductStore: Send + Sync {
  /// Assign a fresh unique id and persist; returns the stored record.
  fn insert(&self, fields: ProductFields) -> Result<Product, StoreError>;

  /// Every record, in insertion order.
  fn get_all(&self) -> Result<Vec<Product>, StoreError>;

  /// `None` when no record has this id.
  fn get(&self, id: &str) -> Result<Option<Product>, StoreError>;

  /// Overwrite every field of an existing record, keeping its id. `None` when
  /// no record has this id.
  fn replace(&self, id: &str, fields: ProductFields) -> Result<Option<Product>, StoreError>;

  /// Hard delete. `false` when no record has this id.
  fn delete(&self, id: &str) -> Result<bool, StoreError>;
}

/// Ids are random v4 UUIDs, so an id never comes back after its record is
/// deleted.
fn fresh_id() -> String {
  Uuid::new_v4().to_string()
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id TEXT PRIMARY KEY,
    record BLOB NOT NULL
);
"#;

/// SQLite-backed store holding one JSON document per product.
pub struct SqliteStore {
  conn: Mutex<Connection>,
}

impl SqliteStore {
  /// Open (or create) the database at `path`, creating parent directories and
  /// applying the schema.
  pub fn open(path: &Path) -> Result<Self, StoreError> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    Self::from_connection(Connection::open(path)?)
  }

  /// Ephemeral store, used by tests.
  pub fn open_in_memory() -> Result<Self, StoreError> {
    Self::from_connection(Connection::open_in_memory()?)
  }

  /// Default database location under the platform data directory.
  pub fn default_path() -> io::Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
      .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "could not determine data directory"))?;
    Ok(data_dir.join("stockroom").join("products.db"))
  }

  fn from_connection(conn: Connection) -> Result<Self, StoreError> {
    conn.execute_batch(SCHEMA)?;
    Ok(Self {
      conn: Mutex::new(conn),
    })
  }

  fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
    self.conn.lock().map_err(|_| StoreError::Poisoned)
  }
}

impl ProductStore for SqliteStore {
  fn insert(&self, fields: ProductFields) -> Result<Product, StoreError> {
    let product = fields.into_product(fresh_id());
    let record = serde_json::to_vec(&product)?;
    self.conn()?.execute(
      "INSERT INTO products (id, record) VALUES (?1, ?2)",
      params![product.id, record],
    )?;
    Ok(product)
  }

  fn get_all(&self) -> Result<Vec<Product>, StoreError> {
    let conn = self.conn()?;
    let mut stmt = conn.prepare("SELECT record FROM products ORDER BY rowid")?;
    let rows = stmt.query_map([], |row| row.get::<_, Vec<u8>>(0))?;

    let mut products = Vec::new();
    for row in rows {
      products.push(serde_json::from_slice(&row?)?);
    }
    Ok(products)
  }

  fn get(&self, id: &str) -> Result<Option<Product>, StoreError> {
    let conn = self.conn()?;
    let record = conn
      .query_row("SELECT record FROM products WHERE id = ?1", params![id], |row| {
        row.get::<_, Vec<u8>>(0)
      })
      .optional()?;

    match record {
      Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
      None => Ok(None),
    }
  }

  fn replace(&self, id: &str, fields: ProductFields) -> Result<Option<Product>, StoreError> {
    let product = fields.into_product(id.to_string());
    let record = serde_json::to_vec(&product)?;
    let changed = self.conn()?.execute(
      "UPDATE products SET record = ?2 WHERE id = ?1",
      params![product.id, record],
    )?;
    Ok((changed > 0).then_some(product))
  }

  fn delete(&self, id: &str) -> Result<bool, StoreError> {
    let deleted = self
      .conn()?
      .execute("DELETE FROM products WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
  }
}

/// In-memory store with the same contract as [`SqliteStore`], preserving
/// insertion order. Backs tests and the in-process test server.
#[derive(Default)]
pub struct MemoryStore {
  records: Mutex<Vec<Product>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  fn records(&self) -> Result<MutexGuard<'_, Vec<Product>>, StoreError> {
    self.records.lock().map_err(|_| StoreError::Poisoned)
  }
}

impl ProductStore for MemoryStore {
  fn insert(&self, fields: ProductFields) -> Result<Product, StoreError> {
    let product = fields.into_product(fresh_id());
    self.records()?.push(product.clone());
    Ok(product)
  }

  fn get_all(&self) -> Result<Vec<Product>, StoreError> {
    Ok(self.records()?.clone())
  }

  fn get(&self, id: &str) -> Result<Option<Product>, StoreError> {
    Ok(self.records()?.iter().find(|p| p.id == id).cloned())
  }

  fn replace(&self, id: &str, fields: ProductFields) -> Result<Option<Product>, StoreError> {
    let mut records = self.records()?;
    match records.iter_mut().find(|p| p.id == id) {
      Some(existing) => {
        *existing = fields.into_product(id.to_string());
        Ok(Some(existing.clone()))
      }
      None => Ok(None),
    }
  }

  fn delete(&self, id: &str) -> Result<bool, StoreError> {
    let mut records = self.records()?;
    let before = records.len();
    records.retain(|p| p.id != id);
    Ok(records.len() < before)
  }
}
