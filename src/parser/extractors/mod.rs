//! Readers of the add-on files
//!
//! - [`snapshot`]: Auctionator listings, through a line rewriting front-end
//! - [`operation`]: TradeSkillMaster buy and sell logs, embedded as CSV text
//! - [`stock`]: TradeSkillMaster bag, bank, mail and auction quantities

pub mod csv;
pub mod operation;
pub mod snapshot;
pub mod stock;

pub use operation::extract_operations;
pub use snapshot::extract_snapshot;
pub use stock::extract_stock;

/// The item id of an item string such as `i:1234` or `item:1234:0:0`
pub fn item_id(item_string: &str) -> Option<i64> {
    item_string.split(':').nth(1)?.parse::<i64>().ok()
}
