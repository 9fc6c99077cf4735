use chrono::Local;

use crate::commands::{format_money, item_name, new_table};
use crate::history::{master_file, HistoryRecord};
use crate::models::Database;
use crate::{CommonOpts, Error};

/// History command
///
/// Lists the trades of this machine's history, for one item if given.
pub fn execute(options: &CommonOpts, item: Option<&str>) -> Result<(), Error> {
    let store_id = options.store_id()?;
    let record = HistoryRecord::load(&master_file(&options.data_folder, &store_id))?;
    let database = Database::load(&options.database_folder())?;

    let operations = match item {
        Some(query) => {
            let item_id = match query.parse::<i64>() {
                Ok(id) => id,
                Err(_) => {
                    database
                        .find_item(query)
                        .ok_or_else(|| Error::from(format!("Item {} not found", query)))?
                        .id
                }
            };
            record.operations_for_item(item_id)
        }
        None => record.operations().iter().collect(),
    };

    let mut table = new_table();
    table.set_titles(row![
        "Date",
        "Type",
        "Item",
        r->"Stack",
        r->"Quantity",
        r->"Price",
        "Other player",
        "Player"
    ]);
    for operation in operations.iter() {
        let time = operation.time.with_timezone(&Local);
        if !options.in_range(time.date_naive()) {
            continue;
        }
        table.add_row(row![
            time.format("%Y-%m-%d %H:%M"),
            format!("{:?}", operation.kind),
            item_name(&database, operation.item),
            r->operation.stack_size,
            r->operation.quantity,
            r->format_money(operation.price as f64),
            operation.other_player,
            operation.player
        ]);
    }
    table.printstd();
    Ok(())
}
