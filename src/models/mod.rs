use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fs::{create_dir_all, read_to_string, write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub use listing::{Item, Language, Listing, SnapshotResult};
pub use operation::{Operation, OperationType};
pub use price::ItemListings;
pub use stock::{Slot, Stock, StockEntry};

use crate::catalog::ItemCatalog;
use crate::error::HistoryError;
use crate::history::list_files;

mod listing;
mod operation;
mod price;
mod stock;

const RESULT_PREFIX: &str = "result-";

/// Every snapshot result of a folder, ready to be queried
#[derive(Debug, Clone, Default)]
pub struct Database {
    pub catalog: ItemCatalog,
    listings: HashMap<i64, ItemListings>,
}

impl Database {
    pub fn new() -> Self {
        Database::default()
    }

    pub fn add(&mut self, result: SnapshotResult) {
        self.catalog.extend(result.items);
        for listing in result.listings {
            self.listings
                .entry(listing.item_id)
                .or_default()
                .push(listing);
        }
    }

    /// Loads every `result-*.json` file of a folder
    ///
    /// A missing folder is an empty database.
    pub fn load(folder: &Path) -> Result<Database, HistoryError> {
        let mut database = Database::new();
        let files = list_files(folder, &format!("{}*.json", RESULT_PREFIX))?;
        for file in files.iter() {
            let content =
                read_to_string(file).map_err(|e| HistoryError::Io(file.clone(), e))?;
            let result: SnapshotResult = serde_json::from_str(&content)
                .map_err(|e| HistoryError::Json(file.clone(), e))?;
            debug!(file = ?file, listings = result.listings.len(), "snapshot result loaded");
            database.add(result);
        }
        info!(
            files = files.len(),
            items = database.catalog.len(),
            "snapshot database loaded"
        );
        Ok(database)
    }

    pub fn item_listings(&self, item_id: i64) -> Option<&ItemListings> {
        self.listings.get(&item_id)
    }

    /// Looks an item up by id, or else by name
    pub fn find_item(&self, query: &str) -> Option<&Item> {
        match query.parse::<i64>() {
            Ok(id) => self.catalog.get(id),
            Err(_) => self.catalog.get_by_name(query),
        }
    }
}

/// Writes a snapshot result as `result-<epoch millis>.json` and returns its path
pub fn save_snapshot_result(
    folder: &Path,
    result: &SnapshotResult,
) -> Result<PathBuf, HistoryError> {
    create_dir_all(folder).map_err(|e| HistoryError::Io(folder.to_path_buf(), e))?;
    let file = folder.join(result_file_name(&result.timestamp));
    let json =
        serde_json::to_string_pretty(result).map_err(|e| HistoryError::Json(file.clone(), e))?;
    write(&file, json).map_err(|e| HistoryError::Io(file.clone(), e))?;
    Ok(file)
}

fn result_file_name(timestamp: &DateTime<Utc>) -> String {
    format!("{}{}.json", RESULT_PREFIX, timestamp.timestamp_millis())
}
