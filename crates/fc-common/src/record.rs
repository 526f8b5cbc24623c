//! Records flowing through the ingestion pipeline and into the stores.

use crate::id::InstanceId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One typed row of the directory API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub id: InstanceId,
    pub name: String,
    pub users: i64,
    pub statuses: i64,
    /// Instance-reported time of its own statistics; `None` when absent or
    /// unparseable.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Persisted statistics snapshot of one instance in one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub update_at: DateTime<Utc>,
    pub id: InstanceId,
    pub users: i64,
    pub statuses: i64,
}

/// Latest known display name of an instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub id: InstanceId,
    pub name: String,
}

impl DirectoryEntry {
    pub fn new(id: impl Into<InstanceId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl From<&InstanceRecord> for DirectoryEntry {
    fn from(record: &InstanceRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
        }
    }
}
