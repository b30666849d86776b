//! Public menu projection

use crate::catalog::Catalog;
use crate::item::{Category, MenuItem};

/// Active items partitioned into the two fixed category groups
///
/// A pure view over a catalog: inactive items are excluded, each active item
/// lands in exactly the group matching its category, and collection order is
/// preserved within each group. Holds no state of its own.
#[derive(Debug)]
pub struct MenuView<'a> {
    /// Active `mushroom` items, collection order
    pub mushrooms: Vec<&'a MenuItem>,
    /// Active `specialty` items, collection order
    pub specialties: Vec<&'a MenuItem>,
}

impl<'a> MenuView<'a> {
    /// Project the public menu out of a catalog
    pub fn project(catalog: &'a Catalog) -> Self {
        let mut mushrooms = Vec::new();
        let mut specialties = Vec::new();
        for item in catalog.iter().filter(|item| item.is_active) {
            match item.category {
                Category::Mushroom => mushrooms.push(item),
                Category::Specialty => specialties.push(item),
            }
        }
        Self {
            mushrooms,
            specialties,
        }
    }

    /// The group for one category
    pub fn group(&self, category: Category) -> &[&'a MenuItem] {
        match category {
            Category::Mushroom => &self.mushrooms,
            Category::Specialty => &self.specialties,
        }
    }

    /// True when no active item exists in either group
    pub fn is_empty(&self) -> bool {
        self.mushrooms.is_empty() && self.specialties.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ItemDraft, ItemId};
    use chrono::Utc;

    fn item(id: &str, name: &str, category: Category, active: bool) -> MenuItem {
        let mut draft = ItemDraft::template(category);
        draft.name = name.to_string();
        draft.is_active = active;
        draft.into_item(ItemId::new(id), Utc::now(), Utc::now())
    }

    #[test]
    fn test_inactive_items_are_excluded() {
        let mut catalog = Catalog::new();
        catalog.insert(item("a", "Golden Teachers", Category::Mushroom, true));
        catalog.insert(item("b", "Blue Meanies", Category::Mushroom, false));
        catalog.insert(item("c", "Chocolate Bar", Category::Specialty, true));

        let menu = MenuView::project(&catalog);
        assert_eq!(menu.mushrooms.len(), 1);
        assert_eq!(menu.mushrooms[0].name, "Golden Teachers");
        assert_eq!(menu.specialties.len(), 1);
        assert_eq!(menu.specialties[0].name, "Chocolate Bar");
    }

    #[test]
    fn test_active_item_lands_in_exactly_one_group() {
        let mut catalog = Catalog::new();
        catalog.insert(item("a", "Golden Teachers", Category::Mushroom, true));
        catalog.insert(item("b", "Gummies", Category::Specialty, true));

        let menu = MenuView::project(&catalog);
        for item in catalog.iter() {
            let in_mushrooms = menu.mushrooms.iter().any(|m| m.id == item.id);
            let in_specialties = menu.specialties.iter().any(|s| s.id == item.id);
            assert!(in_mushrooms != in_specialties);
            assert_eq!(in_mushrooms, item.category == Category::Mushroom);
        }
    }

    #[test]
    fn test_empty_when_nothing_is_active() {
        let mut catalog = Catalog::new();
        catalog.insert(item("a", "Golden Teachers", Category::Mushroom, false));

        let menu = MenuView::project(&catalog);
        assert!(menu.is_empty());
        assert!(menu.group(Category::Mushroom).is_empty());
    }

    #[test]
    fn test_group_preserves_collection_order() {
        let mut catalog = Catalog::new();
        catalog.insert(item("a", "Golden Teachers", Category::Mushroom, true));
        catalog.insert(item("b", "Blue Meanies", Category::Mushroom, true));
        catalog.insert(item("c", "Liberty Caps", Category::Mushroom, true));

        let menu = MenuView::project(&catalog);
        let names: Vec<&str> = menu.mushrooms.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Golden Teachers", "Blue Meanies", "Liberty Caps"]);
    }
}
