use crate::history::{master_file, update_master, UNITARY_FOLDER};
use crate::{CommonOpts, Error};

/// Update command
///
/// Merges the other machines' histories and the new unitary files into the
/// history of this machine.
pub fn execute(options: &CommonOpts) -> Result<(), Error> {
    let store_id = options.store_id()?;
    let data_folder = &options.data_folder;
    let record = update_master(data_folder, &data_folder.join(UNITARY_FOLDER), &store_id)?;
    println!(
        "{} operations from {} unitary files in {}",
        record.operations().len(),
        record.integrated_hashes().len(),
        master_file(data_folder, &store_id).display()
    );
    Ok(())
}
