//! Directory merger: latest name wins per id.

use fc_common::{DirectoryEntry, InstanceId, Result};
use fc_store::TableStore;
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

/// Entry counts of one directory merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DirectoryMerge {
    pub previous: usize,
    pub incoming: usize,
    pub total: usize,
}

/// Keep only the last occurrence of each id.
///
/// Survivors stay at the position of their last occurrence, so the output
/// order follows the input order.
pub fn dedup_keep_last(entries: Vec<DirectoryEntry>) -> Vec<DirectoryEntry> {
    let last: HashMap<InstanceId, usize> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (e.id.clone(), i))
        .collect();

    entries
        .into_iter()
        .enumerate()
        .filter(|(i, e)| last.get(&e.id) == Some(i))
        .map(|(_, e)| e)
        .collect()
}

/// Append `incoming` after the stored entries, dedup, and write back.
///
/// Within `incoming`, API order decides which of several same-id names wins.
pub fn merge_directory<S>(store: &S, incoming: Vec<DirectoryEntry>) -> Result<DirectoryMerge>
where
    S: TableStore<Row = DirectoryEntry>,
{
    let mut entries = store.load()?;
    let previous = entries.len();
    let incoming_len = incoming.len();
    entries.extend(incoming);

    let merged = dedup_keep_last(entries);
    store.save(&merged)?;

    info!(previous, incoming = incoming_len, total = merged.len(), "directory updated");
    Ok(DirectoryMerge {
        previous,
        incoming: incoming_len,
        total: merged.len(),
    })
}
