//! Timeline merger: pure append.

use fc_common::{Result, TimelineEntry};
use fc_store::TableStore;
use serde::Serialize;
use tracing::info;

/// Row counts of one timeline merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimelineMerge {
    pub previous: usize,
    pub appended: usize,
    pub total: usize,
}

/// Append `snapshot` after every stored row and write the result back.
///
/// Not idempotent: appending the same snapshot twice stores it twice, since
/// each run is a separate observation.
pub fn append_timeline<S>(store: &S, snapshot: Vec<TimelineEntry>) -> Result<TimelineMerge>
where
    S: TableStore<Row = TimelineEntry>,
{
    let mut rows = store.load()?;
    let previous = rows.len();
    let appended = snapshot.len();
    rows.extend(snapshot);
    store.save(&rows)?;

    info!(previous, appended, total = rows.len(), "timeline updated");
    Ok(TimelineMerge {
        previous,
        appended,
        total: rows.len(),
    })
}
