//! Admin-side projections: filtering and sorting of the full collection

use crate::item::{Category, MenuItem, Potency, Tier};
use std::cmp::Ordering;

/// Gradient tokens offered by the item form
pub const COLOR_OPTIONS: [&str; 8] = [
    "from-purple-600 to-pink-600",
    "from-blue-600 to-purple-600",
    "from-green-600 to-teal-600",
    "from-yellow-600 to-orange-600",
    "from-red-600 to-pink-600",
    "from-indigo-600 to-blue-600",
    "from-pink-600 to-rose-600",
    "from-teal-600 to-cyan-600",
];

/// Confirmation asked before a delete is issued
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this mushroom variety?";

/// Conjunctive filter over the full collection
///
/// Every field is independently optional; `None` means "all". A populated
/// name matches as a case-insensitive substring, the rest match exactly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemFilter {
    pub name: Option<String>,
    pub potency: Option<Potency>,
    pub tier: Option<Tier>,
    pub category: Option<Category>,
    pub active: Option<bool>,
}

impl ItemFilter {
    /// True when the item passes every populated field
    pub fn matches(&self, item: &MenuItem) -> bool {
        if let Some(needle) = &self.name {
            if !item.name.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        if let Some(potency) = self.potency {
            if item.potency != potency {
                return false;
            }
        }
        if let Some(tier) = self.tier {
            if item.tier != tier {
                return false;
            }
        }
        if let Some(category) = self.category {
            if item.category != category {
                return false;
            }
        }
        if let Some(active) = self.active {
            if item.is_active != active {
                return false;
            }
        }
        true
    }

    /// Keep the matching items, collection order preserved
    pub fn apply<'a, I>(&self, items: I) -> Vec<&'a MenuItem>
    where
        I: IntoIterator<Item = &'a MenuItem>,
    {
        items.into_iter().filter(|item| self.matches(item)).collect()
    }
}

/// Field the admin table sorts by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Active status; active compares as greater
    #[default]
    Active,
    /// Lexicographic on the raw name
    Name,
    /// Creation time
    CreatedAt,
}

/// Sort direction toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    /// Default: active items first under the default key
    #[default]
    Descending,
}

/// Ascending comparison for one sort key
pub fn compare(a: &MenuItem, b: &MenuItem, key: SortKey) -> Ordering {
    match key {
        SortKey::Active => a.is_active.cmp(&b.is_active),
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

/// Sort in place; stable, no secondary key
pub fn sort<'a>(items: &mut [&'a MenuItem], key: SortKey, direction: SortDirection) {
    items.sort_by(|a, b| {
        let ordering = compare(a, b, key);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ItemDraft, ItemId};
    use chrono::{Duration, Utc};

    fn item(id: &str, name: &str, potency: Potency, tier: Tier, active: bool) -> MenuItem {
        let mut draft = ItemDraft::template(Category::Mushroom);
        draft.name = name.to_string();
        draft.potency = potency;
        draft.tier = tier;
        draft.is_active = active;
        let at = Utc::now();
        draft.into_item(ItemId::new(id), at, at)
    }

    fn sample() -> Vec<MenuItem> {
        let mut items = vec![
            item("a", "Golden Teachers", Potency::Moderate, Tier::LightTier, true),
            item("b", "Blue Meanies", Potency::High, Tier::Boomers, true),
            item("c", "Penis Envy", Potency::VeryHigh, Tier::MegaBooms, false),
            item("d", "Albino A+", Potency::ModerateHigh, Tier::MediumTier, true),
        ];
        // Distinct creation times, oldest first.
        for (n, item) in items.iter_mut().enumerate() {
            item.created_at = Utc::now() + Duration::seconds(n as i64);
        }
        items
    }

    #[test]
    fn test_name_filter_is_case_insensitive_substring() {
        let items = sample();
        let filter = ItemFilter {
            name: Some("golden".to_string()),
            ..ItemFilter::default()
        };
        let matched = filter.apply(&items);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "Golden Teachers");
    }

    #[test]
    fn test_default_filter_matches_everything() {
        let items = sample();
        assert_eq!(ItemFilter::default().apply(&items).len(), items.len());
    }

    #[test]
    fn test_filters_compose_conjunctively() {
        let items = sample();
        let by_active = ItemFilter {
            active: Some(true),
            ..ItemFilter::default()
        };
        let by_potency = ItemFilter {
            potency: Some(Potency::High),
            ..ItemFilter::default()
        };
        let combined = ItemFilter {
            active: Some(true),
            potency: Some(Potency::High),
            ..ItemFilter::default()
        };

        // Combined result equals the intersection of the individual results.
        let expected: Vec<&MenuItem> = items
            .iter()
            .filter(|i| by_active.matches(i) && by_potency.matches(i))
            .collect();
        assert_eq!(combined.apply(&items), expected);
        assert_eq!(combined.apply(&items).len(), 1);
        assert_eq!(combined.apply(&items)[0].name, "Blue Meanies");
    }

    #[test]
    fn test_sort_by_name_descending_reverses_ascending() {
        let items = sample();
        let mut ascending: Vec<&MenuItem> = items.iter().collect();
        sort(&mut ascending, SortKey::Name, SortDirection::Ascending);
        let mut descending: Vec<&MenuItem> = items.iter().collect();
        sort(&mut descending, SortKey::Name, SortDirection::Descending);

        let mut reversed = ascending.clone();
        reversed.reverse();
        // No ties in the sample, so descending is the exact reverse.
        assert_eq!(
            descending.iter().map(|i| &i.name).collect::<Vec<_>>(),
            reversed.iter().map(|i| &i.name).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_default_sort_puts_active_first() {
        let items = sample();
        let mut view: Vec<&MenuItem> = items.iter().collect();
        sort(&mut view, SortKey::default(), SortDirection::default());

        assert!(view[0].is_active);
        assert!(!view[view.len() - 1].is_active);
        // Stable: the three active items keep their collection order.
        let active_names: Vec<&str> = view
            .iter()
            .filter(|i| i.is_active)
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(active_names, ["Golden Teachers", "Blue Meanies", "Albino A+"]);
    }

    #[test]
    fn test_sort_by_creation_time() {
        let items = sample();
        let mut view: Vec<&MenuItem> = items.iter().collect();
        sort(&mut view, SortKey::CreatedAt, SortDirection::Ascending);
        let ids: Vec<&str> = view.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c", "d"]);
    }
}
