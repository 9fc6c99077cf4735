//! TradeSkillMaster stock of every synced character

use crate::error::NavigationError;
use crate::models::{Slot, Stock, StockEntry};
use crate::parser::extractors::item_id;
use crate::parser::navigate::{entries, expect_object, get_child, list_strings};
use crate::parser::tree::Node;

/// Name of the quantity table of a slot
fn slot_table(slot: Slot) -> &'static str {
    match slot {
        Slot::Inventory => "bagQuantity",
        Slot::Bank => "bankQuantity",
        Slot::Mail => "mailQuantity",
        Slot::Auction => "auctionQuantity",
    }
}

pub fn slot_key(scope: &str, slot: Slot) -> String {
    format!("s@{}@internalData@{}", scope, slot_table(slot))
}

/// Reads the quantities of every character listed in `_scopeKeys.sync`
///
/// A scope reads `"Name - Faction - Realm"`, the character is the name.
/// Slots without a quantity table hold nothing.
pub fn extract_stock(root: &Node) -> Result<Stock, NavigationError> {
    let scopes = expect_object(expect_object(root, "_scopeKeys")?, "sync")?;
    let mut stock = Stock::new();
    for scope in list_strings(scopes) {
        let character = scope.split(' ').next().unwrap_or(scope);
        for slot in Slot::all().iter() {
            let table = match get_child(root, &slot_key(scope, *slot)) {
                Some(table @ Node::Object(_)) => table,
                _ => continue,
            };
            for (item_string, value) in entries(table) {
                if let (Some(item_id), Node::Num(quantity)) = (item_id(item_string), value) {
                    stock.add(StockEntry {
                        item_id,
                        quantity: *quantity as i64,
                        character: character.to_string(),
                        slot: *slot,
                    });
                }
            }
        }
    }
    Ok(stock)
}
