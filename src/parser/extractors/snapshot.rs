//! Auctionator snapshots
//!
//! The `AUCTIONATOR_SNAPSHOT` table is rewritten line by line into JSON: keys
//! lose their brackets, `=` becomes `:` and the `auctions` object of numbered
//! records becomes a list.

use chrono::{TimeZone, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::SnapshotError;
use crate::models::{Item, Language, Listing, SnapshotResult};

const SNAPSHOT_MARKER: &str = "AUCTIONATOR_SNAPSHOT";
const AUCTIONS_OBJECT: &str = "\"auctions\" : {";

#[derive(Debug, Deserialize)]
struct AuctionatorSnapshot {
    snapshot_at: i64,
    auctions: Vec<AuctionatorAuction>,
}

/// One auction record, with the add-on's one letter keys
#[derive(Debug, Deserialize)]
struct AuctionatorAuction {
    /// quantity
    q: i64,
    /// bid
    s: i64,
    /// buyout, 0 when there is none
    b: i64,
    /// item id
    i: i64,
    /// item name
    n: String,
}

/// Reads the listings of an Auctionator file
///
/// The language decides which name the items get.
pub fn extract_snapshot(content: &str, language: Language) -> Result<SnapshotResult, SnapshotError> {
    let json = snapshot_json(content)?;
    let snapshot: AuctionatorSnapshot = serde_json::from_str(&json)?;
    let timestamp = Utc
        .timestamp_opt(snapshot.snapshot_at, 0)
        .single()
        .ok_or(SnapshotError::InvalidTime(snapshot.snapshot_at))?;

    let mut items = BTreeMap::new();
    let mut listings = Vec::with_capacity(snapshot.auctions.len());
    for auction in snapshot.auctions {
        items
            .entry(auction.i)
            .or_insert_with(|| Item::new(auction.i, &auction.n, language));
        listings.push(Listing {
            item_id: auction.i,
            quantity: auction.q,
            bid_price: auction.s,
            buyout_price: if auction.b == 0 { None } else { Some(auction.b) },
            item_name: auction.n,
            observed_at: timestamp,
        });
    }
    Ok(SnapshotResult {
        language,
        timestamp,
        items: items.into_iter().map(|(_, item)| item).collect(),
        listings,
    })
}

/// The snapshot table rewritten as JSON text
///
/// Commas are dropped from every line and put back between members: a
/// comma is pending after any line that does not open an object, and is
/// only written before a line that does not close one.
pub fn snapshot_json(content: &str) -> Result<String, SnapshotError> {
    let mut json = String::new();
    let mut recording = false;
    let mut comma = false;
    for line in content.lines() {
        if !recording {
            if line.contains(SNAPSHOT_MARKER) {
                recording = true;
                json.push('{');
            }
            continue;
        }
        if line.starts_with('}') {
            json.push('}');
            return Ok(json);
        }
        let clean_line = strip_comment(line)
            .replace('[', "")
            .replace(']', "")
            .replace('=', ":");
        if comma && !clean_line.contains('}') {
            json.push_str(",\n");
            comma = false;
        }
        if clean_line.contains(AUCTIONS_OBJECT) {
            json.push_str("\t\"auctions\" : [");
        } else if clean_line.starts_with("\t}") {
            json.push_str("\t]\n");
        } else {
            json.push_str(&clean_line.replace(',', ""));
            if !clean_line.contains('{') {
                comma = true;
            }
        }
    }
    if recording {
        Ok(json)
    } else {
        Err(SnapshotError::MarkerNotFound)
    }
}

/// Removes everything from the last `--` of a line
fn strip_comment(line: &str) -> &str {
    match line.rfind("--") {
        Some(index) => &line[..index],
        None => line,
    }
}
