//! Item table wrapper.

use crate::error::{Error, Result};
use crate::models::StoredItem;
use morel_core::{wire, ItemDraft, ItemId, ItemPatch, MenuItem};
use native_db::*;
use std::path::Path;
use std::sync::LazyLock;
use uuid::Uuid;

// Static models for the database
static MODELS: LazyLock<Models> = LazyLock::new(|| {
    let mut models = Models::new();
    models.define::<StoredItem>().unwrap();
    models
});

/// Persistent item table.
///
/// Ids and both timestamps are assigned here, never by callers: `insert`
/// mints a UUID and stamps `created_at`/`updated_at`, and every `update`
/// stamps a fresh `updated_at`. Each operation is a single transaction.
pub struct ItemDb {
    pub(crate) db: Database<'static>,
}

impl ItemDb {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Builder::new()
            .create(&MODELS, path.as_ref())
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db })
    }

    /// Create an in-memory database.
    pub fn in_memory() -> Result<Self> {
        let db = Builder::new()
            .create_in_memory(&MODELS)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db })
    }

    /// Commit a new item, assigning its id and timestamps.
    pub fn insert(&self, draft: ItemDraft) -> Result<MenuItem> {
        let at = wire::now();
        let item = draft.into_item(ItemId::new(Uuid::new_v4().to_string()), at, at);
        let rw = self.db.rw_transaction()?;
        rw.upsert(StoredItem::from_item(&item))?;
        rw.commit()?;
        Ok(item)
    }

    /// Apply the present fields of a patch to one item and stamp a fresh
    /// `updated_at`. Returns the committed row.
    pub fn update(&self, id: &ItemId, patch: &ItemPatch) -> Result<MenuItem> {
        let rw = self.db.rw_transaction()?;
        let stored: Option<StoredItem> = rw.get().primary(id.as_str().to_string())?;
        let stored = stored.ok_or_else(|| Error::NotFound(id.to_string()))?;
        let mut item = stored.to_item()?;
        item.apply_patch(patch);
        item.updated_at = wire::advance(item.updated_at);
        rw.upsert(StoredItem::from_item(&item))?;
        rw.commit()?;
        Ok(item)
    }

    /// Delete one item by id.
    pub fn delete(&self, id: &ItemId) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        let stored: Option<StoredItem> = rw.get().primary(id.as_str().to_string())?;
        let stored = stored.ok_or_else(|| Error::NotFound(id.to_string()))?;
        rw.remove(stored)?;
        rw.commit()?;
        Ok(())
    }

    /// Load one item by id.
    pub fn get(&self, id: &ItemId) -> Result<Option<MenuItem>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredItem> = r.get().primary(id.as_str().to_string())?;
        stored.map(|s| s.to_item().map_err(Error::from)).transpose()
    }
}

impl From<native_db::db_type::Error> for Error {
    fn from(err: native_db::db_type::Error) -> Self {
        Error::Database(err.to_string())
    }
}

impl From<morel_core::Error> for Error {
    fn from(err: morel_core::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
