//! Common query patterns for the item table.

use crate::error::{Error, Result};
use crate::models::{StoredItem, StoredItemKey};
use crate::store::ItemDb;
use morel_core::MenuItem;

impl ItemDb {
    /// All items, creation time ascending.
    pub fn select_all(&self) -> Result<Vec<MenuItem>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().secondary::<StoredItem>(StoredItemKey::created_at)?;
        let iter = scan.all()?;
        let rows: std::result::Result<Vec<StoredItem>, _> = iter.collect();
        let rows = rows.map_err(|e| Error::Database(e.to_string()))?;
        rows.into_iter()
            .map(|row| row.to_item().map_err(Error::from))
            .collect()
    }

    /// Number of stored items.
    pub fn count(&self) -> Result<usize> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredItem>()?;
        let iter = scan.all()?;
        Ok(iter.count())
    }
}
