use chrono::Local;

use crate::commands::{format_money, new_table};
use crate::models::Database;
use crate::{CommonOpts, Error};

/// Quotes command
///
/// Cheapest unit buyout of every snapshot, or of every day, or the average
/// unit price of the cheapest units when `best_average` is given.
pub fn execute(
    options: &CommonOpts,
    item: &str,
    best_average: Option<i64>,
    per_day: bool,
) -> Result<(), Error> {
    let database = Database::load(&options.database_folder())?;
    let found = database
        .find_item(item)
        .ok_or_else(|| Error::from(format!("Item {} not found", item)))?;
    let listings = match database.item_listings(found.id) {
        Some(listings) => listings,
        None => return Err(Error::from(format!("No listing of {}", found))),
    };

    let prices: Vec<(String, f64)> = if per_day {
        listings
            .best_buyout_per_day(&Local)
            .into_iter()
            .filter(|(day, _)| options.in_range(*day))
            .map(|(day, price)| (day.to_string(), price))
            .collect()
    } else {
        let per_snapshot = match best_average {
            Some(n) => listings.best_average_buyout(n),
            None => listings.best_buyout(),
        };
        per_snapshot
            .into_iter()
            .map(|(time, price)| (time.with_timezone(&Local), price))
            .filter(|(time, _)| options.in_range(time.date_naive()))
            .map(|(time, price)| (time.format("%Y-%m-%d %H:%M").to_string(), price))
            .collect()
    };

    let mut table = new_table();
    let title = match best_average {
        Some(n) if !per_day => format!("Average of {}", n),
        _ => "Unit buyout".to_string(),
    };
    table.set_titles(row!["Date", r->title]);
    for (date, price) in prices.iter() {
        table.add_row(row![date, r->format_money(*price)]);
    }
    println!("{}", found);
    table.printstd();
    Ok(())
}
