use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationType {
    Buy,
    Sell,
}

/// A completed trade, as logged by the add-on
///
/// Two operations with the same fields are the same event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(rename = "type")]
    pub kind: OperationType,
    pub item: i64,
    pub stack_size: i64,
    pub quantity: i64,
    pub price: i64,
    pub other_player: String,
    pub player: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub time: DateTime<Utc>,
}

/// Chronological first, then every other field so that the order is total
impl Ord for Operation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .cmp(&other.time)
            .then_with(|| self.kind.cmp(&other.kind))
            .then_with(|| self.item.cmp(&other.item))
            .then_with(|| self.stack_size.cmp(&other.stack_size))
            .then_with(|| self.quantity.cmp(&other.quantity))
            .then_with(|| self.price.cmp(&other.price))
            .then_with(|| self.other_player.cmp(&other.other_player))
            .then_with(|| self.player.cmp(&other.player))
    }
}

impl PartialOrd for Operation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            OperationType::Buy => "BUY ",
            OperationType::Sell => "SELL",
        };
        write!(
            f,
            "{} {} {} x{} ({}) {} {} <-> {}",
            self.time.format("%Y-%m-%d %H:%M:%S"),
            kind,
            self.item,
            self.quantity,
            self.stack_size,
            self.price,
            self.player,
            self.other_player
        )
    }
}
