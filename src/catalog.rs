use regex::Regex;
use std::collections::{BTreeMap, HashMap};

use crate::models::Item;

/// The items known from every snapshot read so far
///
/// Snapshots from clients in different languages bring different names for
/// the same item; the catalog keeps both.
///
/// It provides methods for:
/// - Adding items, completing the names of known ones
/// - Retrieving items by id or by any of their names, ignoring case
/// - Searching items with a regular expression
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    names: HashMap<String, i64>,
    items: BTreeMap<i64, Item>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        ItemCatalog::default()
    }

    /// Inserts an item
    ///
    /// A complete item replaces what is known, otherwise the missing names are
    /// taken from the new one.
    pub fn insert(&mut self, item: Item) {
        let merged = match self.items.get(&item.id) {
            Some(known) if !item.complete() => Item {
                id: item.id,
                french_name: known.french_name.clone().or(item.french_name),
                english_name: known.english_name.clone().or(item.english_name),
            },
            _ => item,
        };
        for name in merged.names() {
            self.names.insert(name.to_lowercase(), merged.id);
        }
        self.items.insert(merged.id, merged);
    }

    pub fn get(&self, id: i64) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Item> {
        self.names
            .get(&name.to_lowercase())
            .and_then(|id| self.items.get(id))
    }

    /// The items, by id, with a name matching the regex
    pub fn matching<'a>(&'a self, regex: &'a Regex) -> impl Iterator<Item = &'a Item> + 'a {
        self.items
            .values()
            .filter(move |item| item.names().iter().any(|name| regex.is_match(name)))
    }

    pub fn values(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }
    pub fn len(&self) -> usize {
        self.items.len()
    }
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Extend<Item> for ItemCatalog {
    fn extend<T: IntoIterator<Item = Item>>(&mut self, iter: T) {
        for item in iter {
            self.insert(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Language;

    #[test]
    fn names_from_both_languages() {
        let mut catalog = ItemCatalog::new();
        catalog.insert(Item::new(4625, "Fleur de feu", Language::French));
        catalog.insert(Item::new(4625, "Firebloom", Language::English));
        catalog.insert(Item::new(4382, "Bronze Framework", Language::English));

        assert_eq!(catalog.len(), 2);
        let item = catalog.get(4625).unwrap();
        assert!(item.complete());
        assert_eq!(item.french_name.as_deref(), Some("Fleur de feu"));

        assert_eq!(catalog.get_by_name("FIREBLOOM").unwrap().id, 4625);
        assert_eq!(catalog.get_by_name("fleur de feu").unwrap().id, 4625);
        assert!(catalog.get_by_name("Mithril Spurs").is_none());

        let pattern = Regex::new("(?i)^f").unwrap();
        let ids: Vec<i64> = catalog.matching(&pattern).map(|item| item.id).collect();
        assert_eq!(ids, vec![4625]);
        let pattern = Regex::new("r").unwrap();
        let ids: Vec<i64> = catalog.matching(&pattern).map(|item| item.id).collect();
        assert_eq!(ids, vec![4382, 4625]);
        assert_eq!(catalog.matching(&Regex::new("Warner").unwrap()).count(), 0);
    }

    #[test]
    fn complete_item_replaces() {
        let mut catalog = ItemCatalog::new();
        catalog.insert(Item::new(1, "Old", Language::English));
        catalog.insert(Item {
            id: 1,
            french_name: Some("Nouveau".to_string()),
            english_name: Some("New".to_string()),
        });
        assert_eq!(catalog.get(1).unwrap().english_name.as_deref(), Some("New"));
    }
}
