//! Catalog synchronization over an [`ItemStore`]
//!
//! [`Synchronizer`] mirrors the remote item set in a local [`Catalog`].
//! Mutations go to the store first and the catalog is touched only after
//! the store acknowledges with the committed row, so a failed request
//! leaves local state exactly as it was. Changes made by other writers
//! arrive as [`ChangeEvent`]s and merge through [`apply_event`].
//!
//! [`apply_event`]: Synchronizer::apply_event

use crate::error::{Result, SyncError};
use crate::store::ItemStore;
use morel_core::{Catalog, ChangeEvent, ItemDraft, ItemId, ItemPatch};

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// One transient user-visible notification, queued until drained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

/// Local mirror of the item set behind an [`ItemStore`].
///
/// Owns the catalog, a loading flag (true until the first [`load`]
/// completes), a sticky error flag cleared at the start of every
/// operation, and a queue of notices the embedding UI drains.
///
/// [`load`]: Synchronizer::load
pub struct Synchronizer<S: ItemStore> {
    store: S,
    catalog: Catalog,
    loading: bool,
    error: Option<String>,
    notices: Vec<Notice>,
}

impl<S: ItemStore> Synchronizer<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            catalog: Catalog::new(),
            loading: true,
            error: None,
            notices: Vec::new(),
        }
    }

    /// The mirrored item set.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The backing store, e.g. for direct asset calls.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// True until the first [`load`](Synchronizer::load) completes.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The last operation failure, cleared by the next operation.
    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Drain the queued notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Replace the catalog with the store's full item set.
    ///
    /// On failure the previous catalog is kept; the loading flag clears
    /// either way.
    pub async fn load(&mut self) -> Result<()> {
        self.loading = true;
        self.error = None;
        match self.store.load_items().await {
            Ok(items) => {
                self.catalog.replace_all(items);
                self.loading = false;
                Ok(())
            }
            Err(err) => {
                self.fail("Failed to load mushrooms");
                Err(err.into())
            }
        }
    }

    /// Create an item from `draft` and append the committed row.
    ///
    /// Returns the store-assigned id.
    pub async fn add(&mut self, draft: ItemDraft) -> Result<ItemId> {
        self.error = None;
        match self.store.insert_item(&draft).await {
            Ok(item) => {
                let id = item.id.clone();
                self.catalog.insert(item);
                self.notices.push(Notice::success(format!(
                    "{} has been added successfully.",
                    draft.name
                )));
                Ok(id)
            }
            Err(err) => {
                self.notices
                    .push(Notice::error("Failed to add mushroom. Please try again."));
                self.fail("Failed to add mushroom");
                Err(err.into())
            }
        }
    }

    /// Apply `patch` to one item and merge the committed row.
    ///
    /// An id the catalog does not hold takes the failure path before any
    /// store call.
    pub async fn update(&mut self, id: &ItemId, patch: ItemPatch) -> Result<()> {
        self.error = None;
        if !self.catalog.contains(id) {
            self.notices.push(Notice::error(
                "Failed to update mushroom. Please try again.",
            ));
            self.fail("Failed to update mushroom");
            return Err(SyncError::ItemNotFound(id.clone()));
        }
        match self.store.update_item(id, &patch).await {
            Ok(item) => {
                self.catalog.update(item);
                self.notices
                    .push(Notice::success("Mushroom has been updated successfully."));
                Ok(())
            }
            Err(err) => {
                self.notices.push(Notice::error(
                    "Failed to update mushroom. Please try again.",
                ));
                self.fail("Failed to update mushroom");
                Err(err.into())
            }
        }
    }

    /// Flip one item's `is_active` flag.
    ///
    /// Returns the new state.
    pub async fn toggle_active(&mut self, id: &ItemId) -> Result<bool> {
        self.error = None;
        let (name, active) = match self.catalog.get(id) {
            Some(item) => (item.name.clone(), item.is_active),
            None => {
                self.notices.push(Notice::error(
                    "Failed to toggle mushroom visibility. Please try again.",
                ));
                self.fail("Failed to toggle mushroom visibility");
                return Err(SyncError::ItemNotFound(id.clone()));
            }
        };
        let target = !active;
        match self.store.update_item(id, &ItemPatch::set_active(target)).await {
            Ok(item) => {
                self.catalog.update(item);
                let verb = if target { "activated" } else { "deactivated" };
                self.notices
                    .push(Notice::success(format!("{name} has been {verb}.")));
                Ok(target)
            }
            Err(err) => {
                self.notices.push(Notice::error(
                    "Failed to toggle mushroom visibility. Please try again.",
                ));
                self.fail("Failed to toggle mushroom visibility");
                Err(err.into())
            }
        }
    }

    /// Delete one item.
    pub async fn remove(&mut self, id: &ItemId) -> Result<()> {
        self.error = None;
        match self.store.delete_item(id).await {
            Ok(()) => {
                self.catalog.remove(id);
                self.notices
                    .push(Notice::success("Mushroom has been deleted successfully."));
                Ok(())
            }
            Err(err) => {
                self.notices.push(Notice::error(
                    "Failed to delete mushroom. Please try again.",
                ));
                self.fail("Failed to delete mushroom");
                Err(err.into())
            }
        }
    }

    /// Merge one out-of-band change from the event feed.
    ///
    /// Redelivery is harmless: insert of a present id, update of an absent
    /// id, and delete of an absent id are all no-ops.
    pub fn apply_event(&mut self, event: ChangeEvent) {
        self.catalog.apply(event);
    }

    fn fail(&mut self, text: &str) {
        self.error = Some(text.to_string());
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use morel_core::Category;

    fn draft(name: &str) -> ItemDraft {
        let mut draft = ItemDraft::template(Category::Mushroom);
        draft.name = name.to_string();
        draft.scientific = "Psilocybe cubensis".to_string();
        draft.description = "Perfect for beginners".to_string();
        draft.effects = vec!["Euphoria".to_string()];
        draft.duration = "4-6 hours".to_string();
        draft
    }

    #[tokio::test]
    async fn test_load_replaces_catalog_and_clears_loading() {
        let at = morel_core::wire::now();
        let store = MemoryStore::with_items(vec![
            draft("Golden Teachers").into_item(ItemId::new("id-1"), at, at),
            draft("Blue Meanies").into_item(ItemId::new("id-2"), at, at),
        ]);

        let mut sync = Synchronizer::new(store);
        assert!(sync.is_loading());

        sync.load().await.unwrap();
        assert!(!sync.is_loading());
        assert_eq!(sync.catalog().len(), 2);
        assert_eq!(sync.last_error(), None);
    }

    #[tokio::test]
    async fn test_load_failure_keeps_previous_catalog() {
        let store = MemoryStore::new();
        store.insert_item(&draft("Golden Teachers")).await.unwrap();

        let mut sync = Synchronizer::new(store);
        sync.load().await.unwrap();

        sync.store().arm_failure("connection reset").await;
        assert!(sync.load().await.is_err());

        assert!(!sync.is_loading());
        assert_eq!(sync.catalog().len(), 1);
        assert_eq!(sync.last_error(), Some("Failed to load mushrooms"));
    }

    #[tokio::test]
    async fn test_add_appends_committed_row() {
        let mut sync = Synchronizer::new(MemoryStore::new());
        sync.load().await.unwrap();

        let id = sync.add(draft("Golden Teachers")).await.unwrap();

        let item = sync.catalog().get(&id).unwrap();
        assert_eq!(item.name, "Golden Teachers");
        assert!(!item.id.as_str().is_empty());
        assert_eq!(
            sync.take_notices(),
            vec![Notice::success("Golden Teachers has been added successfully.")]
        );
    }

    #[tokio::test]
    async fn test_add_failure_leaves_catalog_unchanged() {
        let mut sync = Synchronizer::new(MemoryStore::new());
        sync.load().await.unwrap();

        sync.store().arm_failure("connection reset").await;
        assert!(sync.add(draft("Golden Teachers")).await.is_err());

        assert!(sync.catalog().is_empty());
        assert_eq!(sync.last_error(), Some("Failed to add mushroom"));
        assert_eq!(
            sync.take_notices(),
            vec![Notice::error("Failed to add mushroom. Please try again.")]
        );
    }

    #[tokio::test]
    async fn test_next_operation_clears_error_flag() {
        let mut sync = Synchronizer::new(MemoryStore::new());
        sync.load().await.unwrap();

        sync.store().arm_failure("connection reset").await;
        assert!(sync.add(draft("Golden Teachers")).await.is_err());
        assert!(sync.last_error().is_some());

        sync.add(draft("Golden Teachers")).await.unwrap();
        assert_eq!(sync.last_error(), None);
    }

    #[tokio::test]
    async fn test_update_merges_store_row() {
        let mut sync = Synchronizer::new(MemoryStore::new());
        sync.load().await.unwrap();
        let id = sync.add(draft("Golden Teachers")).await.unwrap();
        let before = sync.catalog().get(&id).unwrap().updated_at;
        sync.take_notices();

        let patch = ItemPatch {
            duration: Some("6-8 hours".to_string()),
            ..ItemPatch::default()
        };
        sync.update(&id, patch).await.unwrap();

        let item = sync.catalog().get(&id).unwrap();
        assert_eq!(item.duration, "6-8 hours");
        assert!(item.updated_at > before);
        assert_eq!(
            sync.take_notices(),
            vec![Notice::success("Mushroom has been updated successfully.")]
        );
    }

    #[tokio::test]
    async fn test_update_unknown_id_fails_before_the_store() {
        let mut sync = Synchronizer::new(MemoryStore::new());
        sync.load().await.unwrap();

        let err = sync
            .update(&ItemId::new("missing"), ItemPatch::set_active(false))
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::ItemNotFound(_)));
        assert_eq!(sync.last_error(), Some("Failed to update mushroom"));
        assert_eq!(
            sync.take_notices(),
            vec![Notice::error("Failed to update mushroom. Please try again.")]
        );
    }

    #[tokio::test]
    async fn test_toggle_active_flips_and_reports_state() {
        let mut sync = Synchronizer::new(MemoryStore::new());
        sync.load().await.unwrap();
        let id = sync.add(draft("Golden Teachers")).await.unwrap();
        sync.take_notices();

        assert!(!sync.toggle_active(&id).await.unwrap());
        assert!(!sync.catalog().get(&id).unwrap().is_active);
        assert_eq!(
            sync.take_notices(),
            vec![Notice::success("Golden Teachers has been deactivated.")]
        );

        assert!(sync.toggle_active(&id).await.unwrap());
        assert!(sync.catalog().get(&id).unwrap().is_active);
        assert_eq!(
            sync.take_notices(),
            vec![Notice::success("Golden Teachers has been activated.")]
        );
    }

    #[tokio::test]
    async fn test_toggle_failure_keeps_flag() {
        let mut sync = Synchronizer::new(MemoryStore::new());
        sync.load().await.unwrap();
        let id = sync.add(draft("Golden Teachers")).await.unwrap();
        sync.take_notices();

        sync.store().arm_failure("connection reset").await;
        assert!(sync.toggle_active(&id).await.is_err());

        assert!(sync.catalog().get(&id).unwrap().is_active);
        assert_eq!(sync.last_error(), Some("Failed to toggle mushroom visibility"));
        assert_eq!(
            sync.take_notices(),
            vec![Notice::error(
                "Failed to toggle mushroom visibility. Please try again."
            )]
        );
    }

    #[tokio::test]
    async fn test_remove_deletes_locally() {
        let mut sync = Synchronizer::new(MemoryStore::new());
        sync.load().await.unwrap();
        let first = sync.add(draft("Golden Teachers")).await.unwrap();
        let second = sync.add(draft("Blue Meanies")).await.unwrap();
        sync.take_notices();

        sync.remove(&first).await.unwrap();

        assert_eq!(sync.catalog().len(), 1);
        assert!(sync.catalog().contains(&second));
        assert_eq!(
            sync.take_notices(),
            vec![Notice::success("Mushroom has been deleted successfully.")]
        );
    }

    #[tokio::test]
    async fn test_remove_failure_keeps_item() {
        let mut sync = Synchronizer::new(MemoryStore::new());
        sync.load().await.unwrap();
        let id = sync.add(draft("Golden Teachers")).await.unwrap();
        sync.take_notices();

        sync.store().arm_failure("connection reset").await;
        assert!(sync.remove(&id).await.is_err());

        assert!(sync.catalog().contains(&id));
        assert_eq!(sync.last_error(), Some("Failed to delete mushroom"));
        assert_eq!(
            sync.take_notices(),
            vec![Notice::error("Failed to delete mushroom. Please try again.")]
        );
    }

    #[tokio::test]
    async fn test_apply_event_merges_out_of_band_changes() {
        let store = MemoryStore::new();
        let foreign = store.insert_item(&draft("Liberty Caps")).await.unwrap();

        let mut sync = Synchronizer::new(MemoryStore::new());
        sync.load().await.unwrap();

        sync.apply_event(ChangeEvent::Insert(foreign.clone()));
        sync.apply_event(ChangeEvent::Insert(foreign.clone()));
        assert_eq!(sync.catalog().len(), 1);

        let mut renamed = foreign.clone();
        renamed.name = "Liberty Caps (UK)".to_string();
        sync.apply_event(ChangeEvent::Update(renamed));
        assert_eq!(
            sync.catalog().get(&foreign.id).unwrap().name,
            "Liberty Caps (UK)"
        );

        sync.apply_event(ChangeEvent::Delete {
            id: foreign.id.clone(),
        });
        sync.apply_event(ChangeEvent::Delete { id: foreign.id });
        assert!(sync.catalog().is_empty());
    }
}
