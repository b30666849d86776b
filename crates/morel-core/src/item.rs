//! Menu item entity and its creation/update payloads

use crate::error::Error;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a menu item, assigned by the store on creation
///
/// Stored as the text form of a UUID, but treated as opaque everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    /// Create a new item ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Potency level of a variety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Potency {
    Moderate,
    #[serde(rename = "Moderate-High")]
    ModerateHigh,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl Potency {
    /// All potency levels, in ascending order
    pub const ALL: [Potency; 4] = [
        Potency::Moderate,
        Potency::ModerateHigh,
        Potency::High,
        Potency::VeryHigh,
    ];

    /// The wire/display label for this level
    pub fn label(&self) -> &'static str {
        match self {
            Potency::Moderate => "Moderate",
            Potency::ModerateHigh => "Moderate-High",
            Potency::High => "High",
            Potency::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for Potency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Potency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.label() == s)
            .ok_or_else(|| Error::UnknownLabel(s.to_string()))
    }
}

/// Pricing/strength bucket, independent of potency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "Light Tier")]
    LightTier,
    #[serde(rename = "Medium Tier")]
    MediumTier,
    Boomers,
    MegaBooms,
}

impl Tier {
    /// All tiers, lightest first
    pub const ALL: [Tier; 4] = [
        Tier::LightTier,
        Tier::MediumTier,
        Tier::Boomers,
        Tier::MegaBooms,
    ];

    /// The wire/display label for this tier
    pub fn label(&self) -> &'static str {
        match self {
            Tier::LightTier => "Light Tier",
            Tier::MediumTier => "Medium Tier",
            Tier::Boomers => "Boomers",
            Tier::MegaBooms => "MegaBooms",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Tier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.label() == s)
            .ok_or_else(|| Error::UnknownLabel(s.to_string()))
    }
}

/// The two fixed item categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Mushroom,
    Specialty,
}

impl Category {
    /// Both categories, menu order
    pub const ALL: [Category; 2] = [Category::Mushroom, Category::Specialty];

    /// The wire/display label for this category
    pub fn label(&self) -> &'static str {
        match self {
            Category::Mushroom => "mushroom",
            Category::Specialty => "specialty",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| Error::UnknownLabel(s.to_string()))
    }
}

/// A single menu entry
///
/// The id is immutable and unique; `created_at`/`updated_at` are assigned by
/// the store, and `updated_at` advances on every store mutation. Items carry
/// no relationships to each other.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub id: ItemId,
    pub name: String,
    /// Scientific/subtitle label shown under the name
    pub scientific: String,
    pub description: String,
    /// Ordered effect tags
    pub effects: Vec<String>,
    pub potency: Potency,
    /// Free-text duration label (e.g. "4-6 hours")
    pub duration: String,
    /// Color-gradient token used by presentation
    pub color: String,
    /// Image URL, or absent
    pub image: Option<String>,
    pub tier: Tier,
    /// Quantity-label to price-label, both free-form, insertion-ordered
    pub pricing: IndexMap<String, String>,
    pub category: Category,
    /// Controls public-menu visibility; inactive items stay visible to admin
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MenuItem {
    /// Merge the present fields of a patch into this item
    pub fn apply_patch(&mut self, patch: &ItemPatch) {
        if let Some(v) = &patch.name {
            self.name = v.clone();
        }
        if let Some(v) = &patch.scientific {
            self.scientific = v.clone();
        }
        if let Some(v) = &patch.description {
            self.description = v.clone();
        }
        if let Some(v) = &patch.effects {
            self.effects = v.clone();
        }
        if let Some(v) = patch.potency {
            self.potency = v;
        }
        if let Some(v) = &patch.duration {
            self.duration = v.clone();
        }
        if let Some(v) = &patch.color {
            self.color = v.clone();
        }
        if let Some(v) = &patch.image {
            self.image = v.clone();
        }
        if let Some(v) = patch.tier {
            self.tier = v;
        }
        if let Some(v) = &patch.pricing {
            self.pricing = v.clone();
        }
        if let Some(v) = patch.category {
            self.category = v;
        }
        if let Some(v) = patch.is_active {
            self.is_active = v;
        }
    }
}

/// Creation payload: everything except the store-assigned id and timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    pub scientific: String,
    pub description: String,
    pub effects: Vec<String>,
    pub potency: Potency,
    pub duration: String,
    pub color: String,
    #[serde(default)]
    pub image: Option<String>,
    pub tier: Tier,
    pub pricing: IndexMap<String, String>,
    pub category: Category,
    pub is_active: bool,
}

/// Gradient preselected on an empty form
pub const DEFAULT_COLOR: &str = "from-purple-400 to-pink-500";

impl ItemDraft {
    /// Empty form draft for a category, preseeded with its pricing rows
    ///
    /// Mushrooms price by quantity (`1/8` through `Oz`), specialties by item
    /// count; all price values start empty and must be filled before the
    /// draft validates.
    pub fn template(category: Category) -> Self {
        let labels: &[&str] = match category {
            Category::Mushroom => &["1/8", "1/4", "1/2", "Oz"],
            Category::Specialty => &["1 Item", "3 Items", "5 Items"],
        };
        let pricing = labels
            .iter()
            .map(|label| (label.to_string(), String::new()))
            .collect();
        Self {
            name: String::new(),
            scientific: String::new(),
            description: String::new(),
            effects: Vec::new(),
            potency: Potency::Moderate,
            duration: String::new(),
            color: DEFAULT_COLOR.to_string(),
            image: None,
            tier: Tier::LightTier,
            pricing,
            category,
            is_active: true,
        }
    }

    /// Build the item the store commits for this draft
    pub fn into_item(self, id: ItemId, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> MenuItem {
        MenuItem {
            id,
            name: self.name,
            scientific: self.scientific,
            description: self.description,
            effects: self.effects,
            potency: self.potency,
            duration: self.duration,
            color: self.color,
            image: self.image,
            tier: self.tier,
            pricing: self.pricing,
            category: self.category,
            is_active: self.is_active,
            created_at,
            updated_at,
        }
    }
}

/// Partial update payload: absent fields stay unchanged
///
/// `image` distinguishes "leave as is" (outer `None`) from "clear" (inner
/// `None`), so a patch can remove an image without touching anything else.
/// Serializes with absent fields omitted, which is also its wire form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scientific: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potency: Option<Potency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub image: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<IndexMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl ItemPatch {
    /// Patch that only flips the active flag
    pub fn set_active(active: bool) -> Self {
        Self {
            is_active: Some(active),
            ..Self::default()
        }
    }

    /// True when no field is present
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// A present-but-null field must deserialize to Some(None), not None.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
