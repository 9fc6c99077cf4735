//! Sub-commands of the command line app

use prettytable::{format, Table};

use crate::models::Database;

pub mod history;
pub mod items;
pub mod operations;
pub mod quotes;
pub mod snapshot;
pub mod stock;
pub mod update;

/// A price in copper as gold, silver and copper
pub fn format_money(copper: f64) -> String {
    let copper = copper.round() as i64;
    let (sign, copper) = if copper < 0 { ("-", -copper) } else { ("", copper) };
    let (gold, silver, copper) = (copper / 10000, (copper / 100) % 100, copper % 100);
    if gold > 0 {
        format!("{}{}g {:02}s {:02}c", sign, gold, silver, copper)
    } else if silver > 0 {
        format!("{}{}s {:02}c", sign, silver, copper)
    } else {
        format!("{}{}c", sign, copper)
    }
}

/// Name of an item for display, its id when the item is unknown
pub fn item_name(database: &Database, item_id: i64) -> String {
    match database.catalog.get(item_id) {
        Some(item) => item.to_string(),
        None => item_id.to_string(),
    }
}

pub fn new_table() -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money() {
        assert_eq!(format_money(13.75), "14c");
        assert_eq!(format_money(1234.0), "12s 34c");
        assert_eq!(format_money(1020304.0), "102g 03s 04c");
        assert_eq!(format_money(-250.0), "-2s 50c");
    }
}
