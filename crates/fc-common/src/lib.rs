//! Fedicensus common types, IDs, and errors.
//!
//! This crate provides foundational types shared across the fc-* crates:
//! - Instance and run identity types
//! - Instance, timeline and directory records
//! - The unified error taxonomy
//! - Store schema versioning

pub mod error;
pub mod id;
pub mod record;
pub mod schema;

pub use error::{Error, Result, Stage};
pub use id::{InstanceId, RunId};
pub use record::{DirectoryEntry, InstanceRecord, TimelineEntry};
pub use schema::SCHEMA_VERSION;
