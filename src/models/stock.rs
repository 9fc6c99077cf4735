use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where a character keeps an item
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Slot {
    Inventory,
    Bank,
    Mail,
    Auction,
}

impl Slot {
    pub fn all() -> [Slot; 4] {
        [Slot::Inventory, Slot::Bank, Slot::Mail, Slot::Auction]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockEntry {
    pub item_id: i64,
    pub quantity: i64,
    pub character: String,
    pub slot: Slot,
}

/// Stock of every item for every character and slot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stock {
    stocks: BTreeMap<i64, BTreeMap<String, BTreeMap<Slot, i64>>>,
}

impl Stock {
    pub fn new() -> Self {
        Stock::default()
    }

    /// Quantities of the same item, character and slot add up
    pub fn add(&mut self, entry: StockEntry) {
        *self
            .stocks
            .entry(entry.item_id)
            .or_default()
            .entry(entry.character)
            .or_default()
            .entry(entry.slot)
            .or_insert(0) += entry.quantity;
    }

    pub fn item_in_stock(&self, item_id: i64) -> Vec<StockEntry> {
        let mut entries = vec![];
        if let Some(characters) = self.stocks.get(&item_id) {
            for (character, slots) in characters.iter() {
                for (slot, quantity) in slots.iter() {
                    entries.push(StockEntry {
                        item_id,
                        quantity: *quantity,
                        character: character.clone(),
                        slot: *slot,
                    });
                }
            }
        }
        entries
    }

    /// Total quantity of an item, all characters and slots together
    pub fn total(&self, item_id: i64) -> i64 {
        self.item_in_stock(item_id).iter().map(|e| e.quantity).sum()
    }

    pub fn items(&self) -> impl Iterator<Item = &i64> {
        self.stocks.keys()
    }

    pub fn len(&self) -> usize {
        self.stocks.len()
    }
    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }
}

impl Extend<StockEntry> for Stock {
    fn extend<T: IntoIterator<Item = StockEntry>>(&mut self, iter: T) {
        for entry in iter {
            self.add(entry);
        }
    }
}
