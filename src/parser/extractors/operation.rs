//! TradeSkillMaster buy and sell logs

use chrono::{TimeZone, Utc};
use tracing::debug;

use crate::error::{ExtractError, RowParseError};
use crate::models::{Operation, OperationType};
use crate::parser::extractors::csv::{parse_log, Row, RowBuilder};
use crate::parser::extractors::item_id;
use crate::parser::navigate::expect_string;
use crate::parser::tree::Node;

/// Only trades made at the auction house are kept
pub const AUCTION_SOURCE: &str = "Auction";

pub fn buys_key(realm: &str) -> String {
    format!("r@{}@internalData@csvBuys", realm)
}

pub fn sales_key(realm: &str) -> String {
    format!("r@{}@internalData@csvSales", realm)
}

/// Builds the operations of one log, all of the same kind
struct OperationBuilder {
    kind: OperationType,
}

impl RowBuilder<Operation> for OperationBuilder {
    fn build(&self, row: &Row) -> Result<Option<Operation>, RowParseError> {
        if row.text("source")? != AUCTION_SOURCE {
            return Ok(None);
        }
        let item_string = row.text("itemString")?;
        let item = item_id(item_string).ok_or_else(|| RowParseError::InvalidItemString {
            row: row.index(),
            value: item_string.to_string(),
        })?;
        let seconds = row.integer("time")?;
        let time = Utc
            .timestamp_opt(seconds, 0)
            .single()
            .ok_or(RowParseError::InvalidTime {
                row: row.index(),
                value: seconds,
            })?;
        Ok(Some(Operation {
            kind: self.kind,
            item,
            stack_size: row.integer("stackSize")?,
            quantity: row.integer("quantity")?,
            price: row.integer("price")?,
            other_player: row.text("otherPlayer")?.to_string(),
            player: row.text("player")?.to_string(),
            time,
        }))
    }
}

/// Reads the auction house buys then sales of a realm
///
/// Any malformed row fails the whole extraction.
pub fn extract_operations(root: &Node, realm: &str) -> Result<Vec<Operation>, ExtractError> {
    let buys = expect_string(root, &buys_key(realm))?;
    let sales = expect_string(root, &sales_key(realm))?;

    let mut operations = parse_log(
        buys,
        &OperationBuilder {
            kind: OperationType::Buy,
        },
    )?;
    let bought = operations.len();
    operations.extend(parse_log(
        sales,
        &OperationBuilder {
            kind: OperationType::Sell,
        },
    )?);
    debug!(
        realm,
        buys = bought,
        sales = operations.len() - bought,
        "operations extracted"
    );
    Ok(operations)
}
