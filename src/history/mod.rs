//! Persisted history of trade operations
//!
//! Every extraction run writes its operations to a unitary file whose name
//! carries a hash of its content. Each machine folds the unitary files into
//! its own master record, and master records of other machines are merged in.
//! Both folds are idempotent and do not depend on the order they happen in.

use chrono::{DateTime, Utc};
use glob::{glob, Pattern};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fs::{create_dir_all, read_to_string, write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::HistoryError;
use crate::models::Operation;

pub const UNITARY_FOLDER: &str = "operation-history";
const MASTER_PREFIX: &str = "operation-history-master-";
const HASH_LENGTH: usize = 10;

lazy_static! {
    static ref UNITARY_FILE: Regex =
        Regex::new(r"^operation-history-(\d+)-([0-9A-Fa-f]+)\.json$").unwrap();
}

/// The operations known to one machine, and the unitary files they came from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(rename = "alreadyIntegratedHash")]
    integrated_hashes: BTreeSet<String>,
    operations: Vec<Operation>,
}

impl HistoryRecord {
    pub fn new() -> Self {
        HistoryRecord::default()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn integrated_hashes(&self) -> &BTreeSet<String> {
        &self.integrated_hashes
    }

    pub fn operations_for_item(&self, item: i64) -> Vec<&Operation> {
        self.operations.iter().filter(|o| o.item == item).collect()
    }

    /// Folds in the unitary files of a folder not integrated yet
    ///
    /// Returns whether any new file was found. A missing folder holds no file.
    pub fn integrate(&mut self, folder: &Path) -> Result<bool, HistoryError> {
        let mut operations = BTreeSet::new();
        let mut hashes = BTreeSet::new();
        for file in list_files(folder, "operation-history-*.json")? {
            let hash = match unitary_hash(&file) {
                Some(hash) => hash,
                None => continue,
            };
            if self.integrated_hashes.contains(&hash) || hashes.contains(&hash) {
                continue;
            }
            let content: Vec<Operation> = read_json(&file)?;
            debug!(file = ?file, hash = %hash, operations = content.len(), "unitary file read");
            operations.extend(content);
            hashes.insert(hash);
        }

        if hashes.is_empty() {
            return Ok(false);
        }
        info!(
            files = hashes.len(),
            operations = operations.len(),
            "unitary files integrated"
        );
        self.integrated_hashes.extend(hashes);
        operations.extend(self.operations.drain(..));
        self.operations = operations.into_iter().collect();
        Ok(true)
    }

    /// Unions the operations and the hashes of both records
    pub fn merge(&mut self, other: &HistoryRecord) {
        self.integrated_hashes
            .extend(other.integrated_hashes.iter().cloned());
        let operations: BTreeSet<Operation> = self
            .operations
            .drain(..)
            .chain(other.operations.iter().cloned())
            .collect();
        self.operations = operations.into_iter().collect();
    }

    /// Loads a record, a missing file is an empty record
    pub fn load(path: &Path) -> Result<HistoryRecord, HistoryError> {
        if !path.exists() {
            debug!(file = ?path, "no history file, starting empty");
            return Ok(HistoryRecord::new());
        }
        let mut record: HistoryRecord = read_json(path)?;
        // files written by hand or by older versions may not be sorted
        let operations: BTreeSet<Operation> = record.operations.drain(..).collect();
        record.operations = operations.into_iter().collect();
        Ok(record)
    }

    pub fn save(&self, path: &Path) -> Result<(), HistoryError> {
        write_json(path, self)
    }
}

/// Writes the operations of one extraction run as a unitary file
///
/// The file goes to `<data>/operation-history/` and is named after the time
/// of the run and the beginning of the SHA-256 of its content.
pub fn save_unitary_operations(
    data_folder: &Path,
    operations: &[Operation],
    timestamp: &DateTime<Utc>,
) -> Result<PathBuf, HistoryError> {
    let folder = data_folder.join(UNITARY_FOLDER);
    create_dir_all(&folder).map_err(|e| HistoryError::Io(folder.clone(), e))?;
    let json = serde_json::to_string_pretty(operations)
        .map_err(|e| HistoryError::Json(folder.clone(), e))?;
    let file = folder.join(format!(
        "operation-history-{}-{}.json",
        timestamp.timestamp(),
        content_hash(&json)
    ));
    write(&file, json).map_err(|e| HistoryError::Io(file.clone(), e))?;
    info!(file = ?file, operations = operations.len(), "operations saved");
    Ok(file)
}

/// Upper-case hex of the first bytes of the SHA-256 of a text
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let mut hex = format!("{:X}", hasher.finalize());
    hex.truncate(HASH_LENGTH);
    hex
}

pub fn master_file(data_folder: &Path, store_id: &str) -> PathBuf {
    data_folder.join(format!("{}{}.json", MASTER_PREFIX, store_id))
}

/// Brings the master record of a machine up to date and saves it
///
/// The master records of the other machines found in the data folder are
/// merged, then the unitary files are integrated.
pub fn update_master(
    data_folder: &Path,
    unitary_folder: &Path,
    store_id: &str,
) -> Result<HistoryRecord, HistoryError> {
    let own_file = master_file(data_folder, store_id);
    let mut record = HistoryRecord::load(&own_file)?;
    info!(file = ?own_file, operations = record.operations.len(), "master loaded");

    for file in list_files(data_folder, &format!("{}*.json", MASTER_PREFIX))? {
        if file == own_file {
            continue;
        }
        let other = HistoryRecord::load(&file)?;
        record.merge(&other);
        info!(file = ?file, operations = record.operations.len(), "master merged");
    }

    record.integrate(unitary_folder)?;
    record.save(&own_file)?;
    info!(file = ?own_file, operations = record.operations.len(), "master saved");
    Ok(record)
}

/// The hash part of a unitary file name
fn unitary_hash(file: &Path) -> Option<String> {
    let name = file.file_name()?.to_str()?;
    UNITARY_FILE
        .captures(name)
        .map(|captures| captures[2].to_string())
}

/// The files of a folder whose names match a glob pattern, sorted
///
/// Glob characters in the folder path are taken literally.
pub(crate) fn list_files(folder: &Path, pattern: &str) -> Result<Vec<PathBuf>, HistoryError> {
    let pattern = Path::new(&Pattern::escape(&folder.to_string_lossy())).join(pattern);
    let mut files = Vec::new();
    for entry in glob(&pattern.to_string_lossy())? {
        let file = entry.map_err(|e| HistoryError::Io(e.path().to_path_buf(), e.into_error()))?;
        files.push(file);
    }
    files.sort();
    Ok(files)
}

fn read_json<T: serde::de::DeserializeOwned>(file: &Path) -> Result<T, HistoryError> {
    let content = read_to_string(file).map_err(|e| HistoryError::Io(file.to_path_buf(), e))?;
    serde_json::from_str(&content).map_err(|e| HistoryError::Json(file.to_path_buf(), e))
}

fn write_json<T: Serialize>(file: &Path, value: &T) -> Result<(), HistoryError> {
    if let Some(parent) = file.parent() {
        create_dir_all(parent).map_err(|e| HistoryError::Io(parent.to_path_buf(), e))?;
    }
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| HistoryError::Json(file.to_path_buf(), e))?;
    write(file, json).map_err(|e| HistoryError::Io(file.to_path_buf(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OperationType;
    use chrono::TimeZone;
    use std::fs::read;
    use tempfile::TempDir;

    fn operation(kind: OperationType, item: i64, time: i64) -> Operation {
        Operation {
            kind,
            item,
            stack_size: 1,
            quantity: 1,
            price: 100 * item,
            other_player: "Seller".to_string(),
            player: "Directcompo".to_string(),
            time: Utc.timestamp_opt(time, 0).unwrap(),
        }
    }

    fn at(time: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(time, 0).unwrap()
    }

    fn record(operations: Vec<Operation>, hashes: &[&str]) -> HistoryRecord {
        let mut record = HistoryRecord {
            integrated_hashes: hashes.iter().map(|h| h.to_string()).collect(),
            operations,
        };
        record.operations.sort();
        record
    }

    #[test]
    fn hash_is_upper_case_and_short() {
        // SHA-256 of the empty string starts with e3b0c44298
        assert_eq!(content_hash(""), "E3B0C44298");
        assert_eq!(content_hash("[]").len(), 10);
    }

    #[test]
    fn unitary_file_names() {
        let temp_dir = TempDir::new().unwrap();
        let operations = vec![operation(OperationType::Buy, 1, 10)];
        let file = save_unitary_operations(temp_dir.path(), &operations, &at(1600000000)).unwrap();
        let name = file.file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.starts_with("operation-history-1600000000-"));
        let json = serde_json::to_string_pretty(&operations).unwrap();
        assert_eq!(unitary_hash(&file), Some(content_hash(&json)));
        assert_eq!(unitary_hash(Path::new("operation-history-master-box.json")), None);
    }

    #[test]
    fn integrate_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let data = temp_dir.path();
        let unitary = data.join(UNITARY_FOLDER);
        save_unitary_operations(
            data,
            &[operation(OperationType::Buy, 1, 20), operation(OperationType::Sell, 2, 10)],
            &at(100),
        )
        .unwrap();
        save_unitary_operations(
            data,
            &[operation(OperationType::Buy, 1, 20), operation(OperationType::Buy, 3, 30)],
            &at(200),
        )
        .unwrap();

        let mut history = HistoryRecord::new();
        assert!(history.integrate(&unitary).unwrap());
        assert_eq!(history.operations().len(), 3);
        assert_eq!(history.integrated_hashes().len(), 2);
        let times: Vec<i64> = history.operations().iter().map(|o| o.time.timestamp()).collect();
        assert_eq!(times, vec![10, 20, 30]);

        let master = data.join("master.json");
        history.save(&master).unwrap();
        let first = read(&master).unwrap();
        assert!(!history.integrate(&unitary).unwrap());
        history.save(&master).unwrap();
        assert_eq!(read(&master).unwrap(), first);
    }

    #[test]
    fn integrate_in_two_runs() {
        let one_pass = TempDir::new().unwrap();
        let two_passes = TempDir::new().unwrap();
        let runs = vec![
            vec![operation(OperationType::Buy, 1, 20)],
            vec![operation(OperationType::Sell, 1, 10), operation(OperationType::Buy, 1, 20)],
            vec![operation(OperationType::Buy, 4, 40)],
        ];
        for (index, operations) in runs.iter().enumerate() {
            save_unitary_operations(one_pass.path(), operations, &at(index as i64)).unwrap();
        }

        let mut direct = HistoryRecord::new();
        direct.integrate(&one_pass.path().join(UNITARY_FOLDER)).unwrap();

        let mut incremental = HistoryRecord::new();
        let folder = two_passes.path().join(UNITARY_FOLDER);
        save_unitary_operations(two_passes.path(), &runs[0], &at(0)).unwrap();
        save_unitary_operations(two_passes.path(), &runs[1], &at(1)).unwrap();
        assert!(incremental.integrate(&folder).unwrap());
        save_unitary_operations(two_passes.path(), &runs[2], &at(2)).unwrap();
        assert!(incremental.integrate(&folder).unwrap());

        assert_eq!(incremental, direct);
        assert_eq!(direct.operations().len(), 3);
    }

    #[test]
    fn folder_with_glob_characters() {
        let temp_dir = TempDir::new().unwrap();
        let data = temp_dir.path().join("data [main] *");
        save_unitary_operations(&data, &[operation(OperationType::Buy, 1, 10)], &at(1)).unwrap();

        let mut history = HistoryRecord::new();
        assert!(history.integrate(&data.join(UNITARY_FOLDER)).unwrap());
        assert_eq!(history.operations().len(), 1);
        assert_eq!(list_files(&data, "operation-history-*").unwrap().len(), 1);
    }

    #[test]
    fn missing_folder_integrates_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let mut history = HistoryRecord::new();
        assert!(!history.integrate(&temp_dir.path().join("none")).unwrap());
        assert_eq!(history, HistoryRecord::new());
    }

    #[test]
    fn merge_is_commutative_and_idempotent() {
        let a = record(
            vec![operation(OperationType::Buy, 1, 10), operation(OperationType::Sell, 2, 30)],
            &["AAAAAAAAAA"],
        );
        let b = record(
            vec![operation(OperationType::Sell, 2, 30), operation(OperationType::Buy, 3, 20)],
            &["BBBBBBBBBB"],
        );

        let mut ab = a.clone();
        ab.merge(&b);
        let mut ba = b.clone();
        ba.merge(&a);
        assert_eq!(ab, ba);
        assert_eq!(ab.operations().len(), 3);
        assert_eq!(ab.integrated_hashes().len(), 2);

        let mut aa = a.clone();
        aa.merge(&a);
        assert_eq!(aa, a);

        // the receiver keeps what it had
        let mut empty = HistoryRecord::new();
        empty.merge(&a);
        empty.merge(&HistoryRecord::new());
        assert_eq!(empty, a);
    }

    #[test]
    fn load_missing_and_saved() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("master.json");
        assert_eq!(HistoryRecord::load(&path).unwrap(), HistoryRecord::new());

        let saved = record(vec![operation(OperationType::Buy, 7, 10)], &["0123456789"]);
        saved.save(&path).unwrap();
        let content = read_to_string(&path).unwrap();
        assert!(content.contains("\"alreadyIntegratedHash\""));
        assert_eq!(HistoryRecord::load(&path).unwrap(), saved);
        assert_eq!(saved.operations_for_item(7).len(), 1);
        assert!(saved.operations_for_item(8).is_empty());
    }

    #[test]
    fn broken_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("master.json");
        write(&path, "{ not json").unwrap();
        assert!(matches!(
            HistoryRecord::load(&path),
            Err(HistoryError::Json(..))
        ));
    }

    #[test]
    fn master_update() {
        let temp_dir = TempDir::new().unwrap();
        let data = temp_dir.path();
        record(vec![operation(OperationType::Sell, 9, 5)], &["FFFFFFFFFF"])
            .save(&master_file(data, "laptop"))
            .unwrap();
        save_unitary_operations(data, &[operation(OperationType::Buy, 1, 10)], &at(1)).unwrap();

        let updated = update_master(data, &data.join(UNITARY_FOLDER), "desktop").unwrap();
        assert_eq!(updated.operations().len(), 2);
        assert_eq!(updated.integrated_hashes().len(), 2);
        assert_eq!(
            HistoryRecord::load(&master_file(data, "desktop")).unwrap(),
            updated
        );

        // running again changes nothing
        let again = update_master(data, &data.join(UNITARY_FOLDER), "desktop").unwrap();
        assert_eq!(again, updated);
    }
}
