use chrono::Utc;
use std::convert::TryFrom;
use std::path::PathBuf;
use tracing::warn;

use crate::error::ExtractError;
use crate::history::save_unitary_operations;
use crate::models::Operation;
use crate::parser::extractors::extract_operations;
use crate::parser::Tokenizer;
use crate::{CommonOpts, Error};

/// Operations command
///
/// Stores the auction house trades of every file as a unitary history file,
/// to be integrated by `update`.
pub fn execute(options: &CommonOpts, files: &[PathBuf]) -> Result<(), Error> {
    let mut failures = 0;
    for file in files.iter() {
        match read_operations(file, &options.realm) {
            Ok(operations) => {
                let saved =
                    save_unitary_operations(&options.data_folder, &operations, &Utc::now())?;
                println!(
                    "{} operations of {} stored in {}",
                    operations.len(),
                    options.realm,
                    saved.display()
                );
            }
            Err(e) => {
                warn!(file = ?file, error = %e, "operations skipped");
                eprintln!("{}", Error::from(e));
                failures += 1;
            }
        }
    }
    if failures > 0 {
        return Err(Error::from(format!(
            "{} of {} files could not be read",
            failures,
            files.len()
        )));
    }
    Ok(())
}

fn read_operations(file: &PathBuf, realm: &str) -> Result<Vec<Operation>, ExtractError> {
    let tree = Tokenizer::try_from(file)?.parse_tsm_database()?;
    extract_operations(&tree, realm)
}
