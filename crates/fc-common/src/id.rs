//! Instance and run identity types.
//!
//! The directory API reports instance ids either as strings or as integers;
//! both are normalised to a string key so that stores and merges compare
//! them uniformly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a federated instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(pub String);

impl InstanceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for InstanceId {
    fn from(id: &str) -> Self {
        InstanceId(id.to_string())
    }
}

impl From<String> for InstanceId {
    fn from(id: String) -> Self {
        InstanceId(id)
    }
}

impl From<i64> for InstanceId {
    fn from(id: i64) -> Self {
        InstanceId(id.to_string())
    }
}

/// Run ID for correlating the log lines and summary of one pipeline run.
///
/// Format: `run-<date>-<time>-<random>`
/// Example: `run-20260115-143022-abc123`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub String);

impl RunId {
    /// Generate a new run ID.
    pub fn new() -> Self {
        let now = chrono::Utc::now();
        let random: String = uuid::Uuid::new_v4()
            .to_string()
            .chars()
            .take(6)
            .collect();
        RunId(format!("run-{}-{}", now.format("%Y%m%d-%H%M%S"), random))
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_format() {
        let rid = RunId::new();
        assert!(rid.0.starts_with("run-"));
        // run- + 8 date + - + 6 time + - + 6 random
        assert_eq!(rid.0.len(), 26);
    }

    #[test]
    fn test_integer_ids_normalise_to_strings() {
        assert_eq!(InstanceId::from(42_i64), InstanceId::from("42"));
        assert_eq!(InstanceId::from(42_i64).to_string(), "42");
    }
}
