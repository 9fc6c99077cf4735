use std::convert::TryFrom;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::error::ExtractError;
use crate::models::{save_snapshot_result, SnapshotResult};
use crate::parser::Tokenizer;
use crate::{CommonOpts, Error};

/// Snapshot command
///
/// Every file is read on its own: a broken file is reported and the next one
/// is read.
pub fn execute(options: &CommonOpts, files: &[PathBuf]) -> Result<(), Error> {
    let folder = options.database_folder();
    let mut failures = 0;
    for file in files.iter() {
        match read_snapshot(file, options) {
            Ok(result) => {
                let saved = save_snapshot_result(&folder, &result)?;
                info!(file = ?file, result = ?saved, "snapshot stored");
                println!(
                    "{} listings of {} items seen at {} stored in {}",
                    result.listings.len(),
                    result.items.len(),
                    result.timestamp,
                    saved.display()
                );
            }
            Err(e) => {
                warn!(file = ?file, error = %e, "snapshot skipped");
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

fn read_snapshot(file: &PathBuf, options: &CommonOpts) -> Result<SnapshotResult, ExtractError> {
    Tokenizer::try_from(file)?.parse_snapshot(options.language)
}
