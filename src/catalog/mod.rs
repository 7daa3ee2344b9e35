//! Product domain: record types, the store contract with its backends, and
//! the validating service.

pub mod service;
pub mod store;
pub mod types;
