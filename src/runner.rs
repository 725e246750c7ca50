use color_eyre::Result;
use log::{error, info, warn};

use crate::diff::{DiffRecord, compute_diff};
use crate::fetcher::Fetcher;
use crate::storage::{LookupEntry, Storage, snapshot_file_name};

/// Runs one source through a full snapshot-and-diff cycle and returns the
/// pointer entry describing the snapshot this run produced.
pub fn process_source<F: Fetcher, S: Storage>(
    fetcher: &F,
    storage: &S,
    lookup_table: &[LookupEntry],
    source: &str,
    top_n: usize,
) -> Result<LookupEntry> {
    let ts = time_format::now().unwrap();
    let timestamp = time_format::strftime_utc("%Y%m%d_%H%M%S", ts).unwrap();

    let mut fetch_error = None;
    let current = match fetcher.fetch(source) {
        Ok(posts) => posts,
        Err(e) => {
            warn!("Could not fetch current data for r/{source}: {e:#}");
            fetch_error = Some(format!("{e:#}"));
            Vec::new()
        }
    };

    // The snapshot is written unconditionally; a failed fetch records an
    // empty one under this run's timestamp.
    storage.write_snapshot(source, &timestamp, &current)?;

    if let Some(previous) = lookup_table.iter().find(|entry| entry.source == source) {
        let previous_data = match storage.read_snapshot(source, &previous.timestamp) {
            Ok(data) => data,
            Err(e) => {
                warn!("Could not read previous snapshot for r/{source}: {e:#}");
                None
            }
        };

        let mut error = fetch_error;
        let mut diff = None;
        if error.is_none() {
            if let Some(previous_data) = &previous_data {
                match compute_diff(previous_data, &current, top_n) {
                    Ok(payload) => diff = Some(payload),
                    Err(e) => error = Some(format!("{e:#}")),
                }
            }
        }

        let record = DiffRecord {
            timestamp_previous: previous.timestamp.clone(),
            timestamp_current: timestamp.clone(),
            diff,
            error,
        };
        storage.write_diff_record(source, &previous.timestamp, &timestamp, &record)?;
    }

    Ok(LookupEntry {
        source: source.to_string(),
        label: snapshot_file_name(source, &timestamp),
        timestamp,
    })
}

/// Replaces the entries of sources processed this run and keeps every other
/// source's entry untouched.
pub fn merge_lookup(old: Vec<LookupEntry>, new: Vec<LookupEntry>) -> Vec<LookupEntry> {
    let mut merged = new;
    let untouched: Vec<_> = old
        .into_iter()
        .filter(|entry| !merged.iter().any(|n| n.source == entry.source))
        .collect();
    merged.extend(untouched);
    merged
}

pub fn run_batch<F: Fetcher, S: Storage>(
    fetcher: &F,
    storage: &S,
    sources: &[String],
    top_n: usize,
) -> Result<Vec<LookupEntry>> {
    let lookup_table = storage.read_latest_lookup()?.unwrap_or_default();

    let mut new_entries = Vec::new();
    for source in sources {
        info!("*** Processing r/{source} ***");
        match process_source(fetcher, storage, &lookup_table, source, top_n) {
            Ok(entry) => new_entries.push(entry),
            Err(e) => error!("Error while processing r/{source}: {e:#}"),
        }
    }

    let merged = merge_lookup(lookup_table, new_entries.clone());
    storage.write_latest_lookup(&merged)?;

    Ok(new_entries)
}
