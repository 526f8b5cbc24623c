//! Fedicensus columnar storage.
//!
//! This crate provides:
//! - Arrow schema definitions for the timeline and directory stores
//! - The narrow `TableStore` interface the pipeline merges through
//! - A Parquet-backed table with atomic whole-file replacement
//! - An in-memory table for tests (`test-utils` feature)

pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod schema;
pub mod table;

pub use error::StoreError;
#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryTable;
pub use schema::{directory_schema, timeline_schema, Columnar};
pub use table::{ParquetTable, TableStore};
