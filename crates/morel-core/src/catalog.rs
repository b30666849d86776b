//! In-memory item collection with the merge transitions shared by local
//! mutations and inbound change events

use crate::event::ChangeEvent;
use crate::item::{ItemId, MenuItem};
use indexmap::IndexMap;

/// Ordered collection of menu items, keyed by id
///
/// Order is insertion order, which after a [`replace_all`](Self::replace_all)
/// from the store is creation-time ascending. All mutation paths reduce to
/// three transitions: insert-if-absent, replace-if-present, remove-if-present.
/// Applying the same change twice is a no-op or an overwrite with the same
/// value, so an at-least-once event feed never corrupts the collection.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: IndexMap<ItemId, MenuItem>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the catalog holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by id
    pub fn get(&self, id: &ItemId) -> Option<&MenuItem> {
        self.items.get(id)
    }

    /// True when an item with this id is present
    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    /// Iterate items in collection order
    pub fn iter(&self) -> impl Iterator<Item = &MenuItem> {
        self.items.values()
    }

    /// Replace the whole collection, keeping the given order
    pub fn replace_all(&mut self, items: Vec<MenuItem>) {
        self.items = items.into_iter().map(|item| (item.id.clone(), item)).collect();
    }

    /// Append an item if its id is not already present
    ///
    /// Returns `false` (and changes nothing) when the id exists, which makes
    /// redelivered insert events harmless.
    pub fn insert(&mut self, item: MenuItem) -> bool {
        if self.items.contains_key(&item.id) {
            return false;
        }
        self.items.insert(item.id.clone(), item);
        true
    }

    /// Replace the item with the same id, keeping its position
    ///
    /// Returns `false` when no such item exists; an update for an id this
    /// catalog has never seen is dropped rather than invented.
    pub fn update(&mut self, item: MenuItem) -> bool {
        match self.items.get_mut(&item.id) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    /// Remove an item by id, preserving the order of the rest
    pub fn remove(&mut self, id: &ItemId) -> Option<MenuItem> {
        self.items.shift_remove(id)
    }

    /// Merge one inbound change event
    ///
    /// Uses the same transitions as the synchronous mutation paths; see the
    /// type-level notes on idempotence.
    pub fn apply(&mut self, event: ChangeEvent) {
        match event {
            ChangeEvent::Insert(item) => {
                self.insert(item);
            }
            ChangeEvent::Update(item) => {
                self.update(item);
            }
            ChangeEvent::Delete { id } => {
                self.remove(&id);
            }
        }
    }
}
