//! Fedicensus core: one ingestion run of federated instance statistics.
//!
//! A run fetches the full instance list from the directory API, types and
//! validates it, filters anomalous rows, collapses the survivors into a
//! snapshot stamped with the batch's reference time, and merges the result
//! into the timeline and directory stores.
//!
//! Runs must not overlap. Both merges are whole-file read-modify-write, so
//! two concurrent runs against the same stores lose one run's rows. The
//! scheduler that triggers runs is responsible for serialising them.

pub mod exit_codes;
pub mod fetch;
pub mod ingest;
pub mod logging;
pub mod merge;
pub mod pipeline;

pub use exit_codes::ExitCode;
pub use fetch::{HttpSource, InstanceSource, RawRecord};
pub use ingest::{Batch, TemporalWindow};
pub use pipeline::{init_stores, run_once, run_with_token, InitReport, Pipeline, RunSummary};
