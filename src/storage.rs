use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::{Result, eyre::Context};
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::CONFIG;
use crate::diff::DiffRecord;
use crate::fetcher::Posts;
use crate::util::shorten_for_log;

const LATEST_DATA_LOOKUP_FILENAME: &str = "latest_data_lookup.json";

/// One row of the latest pointer table: which snapshot is the most recent
/// one for a source. `label` is the snapshot file name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupEntry {
    pub source: String,
    pub timestamp: String,
    pub label: String,
}

pub fn snapshot_file_name(source: &str, timestamp: &str) -> String {
    format!("{source}__{timestamp}.json")
}

pub trait Storage {
    fn write_snapshot(&self, source: &str, timestamp: &str, items: &Posts) -> Result<()>;

    /// `Ok(None)` when the snapshot was never written; `Err` when the file
    /// exists but cannot be read or parsed.
    fn read_snapshot(&self, source: &str, timestamp: &str) -> Result<Option<Posts>>;

    fn read_latest_lookup(&self) -> Result<Option<Vec<LookupEntry>>>;

    /// Full overwrite of the persisted table; merging is the caller's job.
    fn write_latest_lookup(&self, entries: &[LookupEntry]) -> Result<()>;

    fn write_diff_record(
        &self,
        source: &str,
        timestamp_previous: &str,
        timestamp_current: &str,
        record: &DiffRecord,
    ) -> Result<()>;
}

pub struct FileStorage {
    data_dir: PathBuf,
}

impl FileStorage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        // routed through Value so objects serialize with sorted keys
        let value = serde_json::to_value(value)?;
        fs::create_dir_all(&self.data_dir)?;
        fs::write(path, serde_json::to_string_pretty(&value)?)
            .wrap_err_with(|| format!("could not write file {}", path.display()))
    }

    fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        debug!("Reading file {}", path.display());
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)
            .wrap_err_with(|| format!("could not read file {}", path.display()))?;
        let parsed = serde_json::from_str(&raw)
            .wrap_err_with(|| format!("could not parse file {}", path.display()))?;
        Ok(Some(parsed))
    }
}

impl Storage for FileStorage {
    fn write_snapshot(&self, source: &str, timestamp: &str, items: &Posts) -> Result<()> {
        let path = self.file_path(&snapshot_file_name(source, timestamp));
        debug!(
            "Saving snapshot into file {} - {}",
            path.display(),
            shorten_for_log(items, CONFIG.max_data_log_length)
        );
        self.write_json(&path, items)
    }

    fn read_snapshot(&self, source: &str, timestamp: &str) -> Result<Option<Posts>> {
        self.read_json(&self.file_path(&snapshot_file_name(source, timestamp)))
    }

    fn read_latest_lookup(&self) -> Result<Option<Vec<LookupEntry>>> {
        self.read_json(&self.file_path(LATEST_DATA_LOOKUP_FILENAME))
    }

    fn write_latest_lookup(&self, entries: &[LookupEntry]) -> Result<()> {
        let path = self.file_path(LATEST_DATA_LOOKUP_FILENAME);
        debug!(
            "Updating latest data lookup file {} - {}",
            path.display(),
            shorten_for_log(&entries, CONFIG.max_data_log_length)
        );
        self.write_json(&path, &entries)
    }

    fn write_diff_record(
        &self,
        source: &str,
        timestamp_previous: &str,
        timestamp_current: &str,
        record: &DiffRecord,
    ) -> Result<()> {
        let path = self.file_path(&format!(
            "{source}__{timestamp_previous}__{timestamp_current}.json"
        ));
        debug!(
            "Saving diff into file {} - {}",
            path.display(),
            shorten_for_log(record, CONFIG.max_data_log_length)
        );
        self.write_json(&path, record)
    }
}
