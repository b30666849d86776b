//! Morel Store - persistent item table using native_db
//!
//! Provides the table-like resource behind the catalog:
//! - select-all in creation-time order
//! - insert-one, returning the row with its assigned id and timestamps
//! - update-one-by-id with partial fields and a fresh updated timestamp
//! - delete-one-by-id
//!
//! Every mutation returns the committed row so the caller can publish the
//! matching change event; publishing itself happens a layer up.

mod error;
mod models;
mod queries;
mod store;

pub use error::{Error, Result};
pub use store::ItemDb;
