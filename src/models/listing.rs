use chrono::{DateTime, Utc};
use num::{BigInt, BigRational};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Language of the game client, it decides which name an item gets
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Language {
    French,
    English,
}

impl FromStr for Language {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "french" | "fr" => Ok(Language::French),
            "english" | "en" => Ok(Language::English),
            _ => Err(format!("Unknown language {:?}, expected english or french", s)),
        }
    }
}

/// An item listed at the auction house
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i64,
    pub french_name: Option<String>,
    pub english_name: Option<String>,
}

impl Item {
    pub fn new(id: i64, name: &str, language: Language) -> Item {
        match language {
            Language::French => Item {
                id,
                french_name: Some(name.to_string()),
                english_name: None,
            },
            Language::English => Item {
                id,
                french_name: None,
                english_name: Some(name.to_string()),
            },
        }
    }
    /// Both names are known
    pub fn complete(&self) -> bool {
        self.french_name.is_some() && self.english_name.is_some()
    }
    pub fn names(&self) -> Vec<&str> {
        self.french_name
            .iter()
            .chain(self.english_name.iter())
            .map(|s| s.as_str())
            .collect()
    }
}

impl Display for Item {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = self
            .english_name
            .as_ref()
            .or_else(|| self.french_name.as_ref())
            .map(|s| s.as_str())
            .unwrap_or("?");
        write!(f, "{} {}", self.id, name)
    }
}

/// One auction seen in a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub item_id: i64,
    pub quantity: i64,
    pub bid_price: i64,
    /// `None` when the auction can only be bid on
    pub buyout_price: Option<i64>,
    pub item_name: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub observed_at: DateTime<Utc>,
}

impl Listing {
    pub fn unit_buyout(&self) -> Option<BigRational> {
        self.buyout_price
            .and_then(|buyout| unit_price(buyout, self.quantity))
    }
}

fn unit_price(price: i64, quantity: i64) -> Option<BigRational> {
    if quantity <= 0 {
        return None;
    }
    Some(BigRational::new(BigInt::from(price), BigInt::from(quantity)))
}

/// Everything read from one Auctionator snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotResult {
    pub language: Language,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
    pub items: Vec<Item>,
    #[serde(rename = "auctions")]
    pub listings: Vec<Listing>,
}
