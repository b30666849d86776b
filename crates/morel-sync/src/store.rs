//! The store seam between the synchronizer and its backend
//!
//! [`ItemStore`] is the table-shaped interface the synchronizer drives.
//! [`RemoteStore`](crate::RemoteStore) implements it over HTTP;
//! [`MemoryStore`] implements it in-process for tests and embedded use.

use crate::error::StoreError;
use indexmap::IndexMap;
use morel_core::{wire, ItemDraft, ItemId, ItemPatch, MenuItem};
use tokio::sync::Mutex;
use uuid::Uuid;

/// A table of menu items that something else persists
///
/// The store owns ids and timestamps: `insert_item` assigns all three,
/// `update_item` stamps a fresh `updated_at`, and both return the committed
/// row so callers can mirror exactly what was stored.
#[allow(async_fn_in_trait)]
pub trait ItemStore {
    /// Fetch every item, creation time ascending.
    async fn load_items(&self) -> Result<Vec<MenuItem>, StoreError>;

    /// Commit a new item and return it with its assigned id and timestamps.
    async fn insert_item(&self, draft: &ItemDraft) -> Result<MenuItem, StoreError>;

    /// Apply the present fields of `patch` to one item and return the
    /// committed row.
    ///
    /// Unknown ids are rejected.
    async fn update_item(&self, id: &ItemId, patch: &ItemPatch) -> Result<MenuItem, StoreError>;

    /// Delete one item.
    ///
    /// Unknown ids are rejected.
    async fn delete_item(&self, id: &ItemId) -> Result<(), StoreError>;
}

#[derive(Default)]
struct Inner {
    items: IndexMap<ItemId, MenuItem>,
    fail_next: Option<String>,
}

impl Inner {
    fn take_armed(&mut self) -> Result<(), StoreError> {
        match self.fail_next.take() {
            Some(message) => Err(StoreError::Transport(message)),
            None => Ok(()),
        }
    }
}

/// In-process [`ItemStore`] with the same observable behavior as the real
/// backend: it assigns ids and timestamps and rejects unknown ids.
///
/// [`arm_failure`](MemoryStore::arm_failure) makes the next operation fail,
/// which is how tests reach the failure paths without a network.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing rows, e.g. a snapshot taken from another store.
    pub fn with_items(items: Vec<MenuItem>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                items: items
                    .into_iter()
                    .map(|item| (item.id.clone(), item))
                    .collect(),
                fail_next: None,
            }),
        }
    }

    /// Make the next operation fail with a transport error carrying `message`.
    pub async fn arm_failure(&self, message: &str) {
        self.inner.lock().await.fail_next = Some(message.to_string());
    }
}

impl ItemStore for MemoryStore {
    async fn load_items(&self) -> Result<Vec<MenuItem>, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.take_armed()?;
        Ok(inner.items.values().cloned().collect())
    }

    async fn insert_item(&self, draft: &ItemDraft) -> Result<MenuItem, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.take_armed()?;
        let at = wire::now();
        let item = draft
            .clone()
            .into_item(ItemId::new(Uuid::new_v4().to_string()), at, at);
        inner.items.insert(item.id.clone(), item.clone());
        Ok(item)
    }

    async fn update_item(&self, id: &ItemId, patch: &ItemPatch) -> Result<MenuItem, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.take_armed()?;
        let item = inner
            .items
            .get_mut(id)
            .ok_or_else(|| StoreError::Rejected {
                status: 404,
                message: "Item not found".to_string(),
            })?;
        item.apply_patch(patch);
        item.updated_at = wire::advance(item.updated_at);
        Ok(item.clone())
    }

    async fn delete_item(&self, id: &ItemId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        inner.take_armed()?;
        inner
            .items
            .shift_remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::Rejected {
                status: 404,
                message: "Item not found".to_string(),
            })
    }
}
