use regex::RegexBuilder;

use crate::commands::new_table;
use crate::models::Database;
use crate::{CommonOpts, Error};

/// Items command
///
/// Lists the items of the stored snapshots whose names match the query.
pub fn execute(options: &CommonOpts, query: &[String]) -> Result<(), Error> {
    let database = Database::load(&options.database_folder())?;
    let pattern = RegexBuilder::new(&query.join("|"))
        .case_insensitive(true)
        .build()
        .map_err(|e| Error::from(e.to_string()))?;

    let mut table = new_table();
    table.set_titles(row![r->"Id", "English", "French"]);
    for item in database.catalog.matching(&pattern) {
        table.add_row(row![
            r->item.id,
            item.english_name.as_deref().unwrap_or(""),
            item.french_name.as_deref().unwrap_or("")
        ]);
    }
    table.printstd();
    Ok(())
}
