use regex::RegexBuilder;
use std::collections::HashSet;
use std::convert::TryFrom;
use std::path::PathBuf;

use crate::commands::{item_name, new_table};
use crate::error::ExtractError;
use crate::models::Database;
use crate::parser::extractors::extract_stock;
use crate::parser::Tokenizer;
use crate::{CommonOpts, Error};

/// Stock command
///
/// Item names come from the stored snapshots.
pub fn execute(options: &CommonOpts, file: &PathBuf, query: &[String]) -> Result<(), Error> {
    let tree = Tokenizer::try_from(file)?.parse_tsm_database()?;
    let stock = extract_stock(&tree).map_err(ExtractError::from)?;
    let database = Database::load(&options.database_folder())?;
    let pattern = RegexBuilder::new(&query.join("|"))
        .case_insensitive(true)
        .build()
        .map_err(|e| Error::from(e.to_string()))?;

    let wanted: HashSet<i64> = database.catalog.matching(&pattern).map(|item| item.id).collect();

    let mut table = new_table();
    table.set_titles(row!["Item", "Character", "Slot", r->"Quantity"]);
    for item_id in stock.items() {
        if !query.is_empty() && !wanted.contains(item_id) {
            continue;
        }
        let name = item_name(&database, *item_id);
        for entry in stock.item_in_stock(*item_id) {
            table.add_row(row![
                name,
                entry.character,
                format!("{:?}", entry.slot),
                r->entry.quantity
            ]);
        }
    }
    table.printstd();
    Ok(())
}
