//! Change events observed on the catalog

use crate::item::{ItemId, MenuItem};

/// One committed change to the item table, as delivered by the change-event
/// channel
///
/// Events cover every writer's changes, including the observing session's
/// own, and may arrive more than once and in no particular order. They are
/// safe to apply through [`Catalog::apply`](crate::Catalog::apply), which
/// treats redelivery as an idempotent overwrite.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    /// A row was inserted
    Insert(MenuItem),
    /// A row was updated; carries the full new row
    Update(MenuItem),
    /// A row was deleted
    Delete { id: ItemId },
}

impl ChangeEvent {
    /// The id of the item this event concerns
    pub fn item_id(&self) -> &ItemId {
        match self {
            ChangeEvent::Insert(item) | ChangeEvent::Update(item) => &item.id,
            ChangeEvent::Delete { id } => id,
        }
    }
}
