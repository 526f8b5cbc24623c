//! Merging a run's output into the persisted stores.
//!
//! The two stores are written independently: a failure between the
//! timeline write and the directory write leaves the timeline one run ahead
//! of the directory. Each store on its own is either fully updated or
//! untouched.

pub mod directory;
pub mod timeline;

pub use directory::{dedup_keep_last, merge_directory, DirectoryMerge};
pub use timeline::{append_timeline, TimelineMerge};
