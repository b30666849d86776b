//! Stored row model for the item table.

use morel_core::wire::{format_timestamp, parse_timestamp};
use morel_core::{ItemId, MenuItem};
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Stored menu item in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 1, version = 1)]
#[native_db]
pub struct StoredItem {
    /// Primary key - item ID (UUID text form).
    #[primary_key]
    pub id: String,
    pub name: String,
    pub scientific: String,
    pub description: String,
    pub effects: Vec<String>,
    /// Potency label.
    pub potency: String,
    pub duration: String,
    pub color: String,
    pub image: Option<String>,
    /// Tier label.
    pub tier: String,
    /// Serialized pricing map, insertion order preserved.
    pub pricing: Vec<u8>,
    /// Category label.
    pub category: String,
    pub is_active: bool,
    /// RFC 3339 text; fixed width, so the key order is chronological.
    #[secondary_key]
    pub created_at: String,
    pub updated_at: String,
}

impl StoredItem {
    /// Create from a domain item.
    pub fn from_item(item: &MenuItem) -> Self {
        let pricing = bincode::serialize(&item.pricing).unwrap_or_default();
        Self {
            id: item.id.as_str().to_string(),
            name: item.name.clone(),
            scientific: item.scientific.clone(),
            description: item.description.clone(),
            effects: item.effects.clone(),
            potency: item.potency.label().to_string(),
            duration: item.duration.clone(),
            color: item.color.clone(),
            image: item.image.clone(),
            tier: item.tier.label().to_string(),
            pricing,
            category: item.category.label().to_string(),
            is_active: item.is_active,
            created_at: format_timestamp(item.created_at),
            updated_at: format_timestamp(item.updated_at),
        }
    }

    /// Convert to a domain item.
    pub fn to_item(&self) -> morel_core::Result<MenuItem> {
        Ok(MenuItem {
            id: ItemId::new(self.id.clone()),
            name: self.name.clone(),
            scientific: self.scientific.clone(),
            description: self.description.clone(),
            effects: self.effects.clone(),
            potency: self.potency.parse()?,
            duration: self.duration.clone(),
            color: self.color.clone(),
            image: self.image.clone(),
            tier: self.tier.parse()?,
            pricing: bincode::deserialize(&self.pricing).unwrap_or_default(),
            category: self.category.parse()?,
            is_active: self.is_active,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}
