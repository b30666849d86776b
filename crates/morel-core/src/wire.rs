//! Wire shapes shared by the HTTP API and the change feed
//!
//! The store speaks snake-cased rows with RFC 3339 timestamp strings; the
//! domain speaks [`MenuItem`] with parsed timestamps. The mapping between
//! the two is explicit and lives here, so neither side leaks into the other.
//! Drafts and patches serialize as-is (their field names already match the
//! wire) and need no separate row type.

use crate::error::{Error, Result};
use crate::event::ChangeEvent;
use crate::item::{Category, ItemId, MenuItem, Potency, Tier};
use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Fixed-width RFC 3339 form used for stored and transmitted timestamps
///
/// Microsecond precision keeps the text form lexicographically ordered the
/// same way as the instants it encodes.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored/transmitted timestamp back into an instant
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| Error::InvalidRow(format!("bad timestamp {s:?}: {e}")))
}

/// Current time at the precision the wire form keeps
///
/// Anything that assigns timestamps must use this so a stored row parses
/// back to exactly the instant that was committed.
pub fn now() -> DateTime<Utc> {
    let at = Utc::now();
    DateTime::from_timestamp_micros(at.timestamp_micros()).unwrap_or(at)
}

/// Fresh `updated_at` for a mutation of a row last touched at `previous`
///
/// Strictly greater than `previous`, even when the clock has not moved past
/// the previous mutation's microsecond.
pub fn advance(previous: DateTime<Utc>) -> DateTime<Utc> {
    let at = now();
    if at > previous {
        at
    } else {
        previous + chrono::Duration::microseconds(1)
    }
}

/// One item row as it travels over the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRow {
    pub id: ItemId,
    pub name: String,
    pub scientific: String,
    pub description: String,
    pub effects: Vec<String>,
    pub potency: Potency,
    pub duration: String,
    pub color: String,
    pub image: Option<String>,
    pub tier: Tier,
    pub pricing: IndexMap<String, String>,
    pub category: Category,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl ItemRow {
    /// Build the wire row for a domain item
    pub fn from_item(item: &MenuItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            scientific: item.scientific.clone(),
            description: item.description.clone(),
            effects: item.effects.clone(),
            potency: item.potency,
            duration: item.duration.clone(),
            color: item.color.clone(),
            image: item.image.clone(),
            tier: item.tier,
            pricing: item.pricing.clone(),
            category: item.category,
            is_active: item.is_active,
            created_at: format_timestamp(item.created_at),
            updated_at: format_timestamp(item.updated_at),
        }
    }

    /// Convert a wire row into a domain item
    pub fn into_item(self) -> Result<MenuItem> {
        Ok(MenuItem {
            id: self.id,
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
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

/// Row payload of a delete event: only the id survives the deletion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRow {
    pub id: ItemId,
}

/// Tagged wire form of a change event: `{"kind": ..., "row": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "row", rename_all = "lowercase")]
pub enum ChangeRow {
    Insert(ItemRow),
    Update(ItemRow),
    Delete(DeleteRow),
}

impl ChangeRow {
    /// Build the wire form of a change event
    pub fn from_event(event: &ChangeEvent) -> Self {
        match event {
            ChangeEvent::Insert(item) => ChangeRow::Insert(ItemRow::from_item(item)),
            ChangeEvent::Update(item) => ChangeRow::Update(ItemRow::from_item(item)),
            ChangeEvent::Delete { id } => ChangeRow::Delete(DeleteRow { id: id.clone() }),
        }
    }

    /// Convert back into a domain event
    pub fn into_event(self) -> Result<ChangeEvent> {
        Ok(match self {
            ChangeRow::Insert(row) => ChangeEvent::Insert(row.into_item()?),
            ChangeRow::Update(row) => ChangeEvent::Update(row.into_item()?),
            ChangeRow::Delete(row) => ChangeEvent::Delete { id: row.id },
        })
    }
}

/// Sign-in request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Sign-in reply carrying the bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRow {
    pub token: String,
}

/// Error body returned by every endpoint on failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorRow {
    pub error: String,
}

/// Public menu reply: active rows grouped by category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuRows {
    pub mushrooms: Vec<ItemRow>,
    pub specialties: Vec<ItemRow>,
}

/// Upload reply carrying the public URL of the stored object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRow {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemDraft;

    fn sample_item() -> MenuItem {
        let mut draft = ItemDraft::template(Category::Mushroom);
        draft.name = "Golden Teachers".to_string();
        draft.scientific = "Psilocybe cubensis".to_string();
        draft.description = "Perfect for beginners".to_string();
        draft.effects = vec!["Euphoria".to_string(), "Deep Insights".to_string()];
        draft.duration = "4-6 hours".to_string();
        draft.pricing.insert("1/8".to_string(), "$20".to_string());
        draft.into_item(ItemId::new("id-1"), now(), now())
    }

    #[test]
    fn test_row_round_trip_preserves_fields() {
        let item = sample_item();
        let row = ItemRow::from_item(&item);
        let back = row.into_item().unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_row_uses_snake_case_wire_names() {
        let json = serde_json::to_string(&ItemRow::from_item(&sample_item())).unwrap();
        assert!(json.contains("\"is_active\":"));
        assert!(json.contains("\"created_at\":"));
        assert!(json.contains("\"updated_at\":"));
        assert!(json.contains("\"scientific\":"));
    }

    #[test]
    fn test_bad_timestamp_is_an_invalid_row() {
        let mut row = ItemRow::from_item(&sample_item());
        row.created_at = "yesterday".to_string();
        assert!(matches!(row.into_item(), Err(Error::InvalidRow(_))));
    }

    #[test]
    fn test_timestamp_text_orders_like_instants() {
        let earlier = now();
        let later = earlier + chrono::Duration::microseconds(1);
        assert!(format_timestamp(earlier) < format_timestamp(later));
        assert_eq!(parse_timestamp(&format_timestamp(earlier)).unwrap(), earlier);
    }

    #[test]
    fn test_advance_is_strictly_monotonic() {
        let first = now();
        let second = advance(first);
        let third = advance(second);
        assert!(second > first);
        assert!(third > second);

        // Even against a timestamp from the future.
        let ahead = now() + chrono::Duration::days(1);
        assert!(advance(ahead) > ahead);
    }

    #[test]
    fn test_change_row_tagged_form() {
        let item = sample_item();
        let json = serde_json::to_string(&ChangeRow::from_event(&ChangeEvent::Insert(item.clone())))
            .unwrap();
        assert!(json.starts_with("{\"kind\":\"insert\",\"row\":{"));

        let delete = ChangeRow::from_event(&ChangeEvent::Delete {
            id: ItemId::new("id-1"),
        });
        assert_eq!(
            serde_json::to_string(&delete).unwrap(),
            "{\"kind\":\"delete\",\"row\":{\"id\":\"id-1\"}}"
        );

        let parsed: ChangeRow = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.into_event().unwrap(), ChangeEvent::Insert(item));
    }
}
