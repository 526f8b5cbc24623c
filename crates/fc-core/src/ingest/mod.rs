//! Turning raw API rows into a snapshot.
//!
//! - **`typing`**: coerces fields and fixes the batch reference time
//! - **`filter`**: drops invalid and temporally anomalous records
//! - **`snapshot`**: projects survivors to timeline rows

pub mod filter;
pub mod snapshot;
pub mod typing;

pub use filter::{filter_records, TemporalWindow};
pub use snapshot::{build_snapshot, minute_floor};
pub use typing::{median_time, type_record, Batch};
