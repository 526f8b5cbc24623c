//! Field coercion and the batch reference time.

use crate::fetch::RawRecord;
use chrono::{DateTime, NaiveDateTime, Utc};
use fc_common::{Error, InstanceId, InstanceRecord, Result};
use serde_json::Value;
use tracing::debug;

/// Naive timestamp layouts accepted besides RFC 3339, read as UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Typed records of one run plus the reference time derived from them.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// Records in API order.
    pub records: Vec<InstanceRecord>,
    /// Median `updated_at` over every record that has one, computed before
    /// any filtering.
    pub reference_time: DateTime<Utc>,
}

impl Batch {
    /// Type every raw record, then fix the reference time.
    ///
    /// A value that cannot be coerced fails the whole batch; an unparseable
    /// `updated_at` only marks that record as missing a timestamp.
    pub fn from_raw(raw: Vec<RawRecord>) -> Result<Self> {
        let records = raw
            .iter()
            .enumerate()
            .map(|(index, record)| type_record(index, record))
            .collect::<Result<Vec<_>>>()?;
        Self::from_records(records)
    }

    pub fn from_records(records: Vec<InstanceRecord>) -> Result<Self> {
        let timestamps: Vec<_> = records.iter().filter_map(|r| r.updated_at).collect();
        let reference_time = median_time(&timestamps).ok_or_else(|| {
            Error::InsufficientData(format!(
                "none of {} records has a parseable updated_at",
                records.len()
            ))
        })?;
        debug!(
            records = records.len(),
            timestamped = timestamps.len(),
            reference_time = %reference_time,
            "batch typed"
        );
        Ok(Self {
            records,
            reference_time,
        })
    }
}

/// Median of a set of instants; the midpoint of the middle pair for an
/// even count. `None` when empty.
pub fn median_time(times: &[DateTime<Utc>]) -> Option<DateTime<Utc>> {
    if times.is_empty() {
        return None;
    }
    let mut sorted = times.to_vec();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        let (lo, hi) = (sorted[mid - 1], sorted[mid]);
        Some(lo + (hi - lo) / 2)
    }
}

/// Coerce one raw record.
pub fn type_record(index: usize, raw: &RawRecord) -> Result<InstanceRecord> {
    Ok(InstanceRecord {
        id: coerce_id(index, raw.get("id"))?,
        name: coerce_name(raw.get("name")),
        users: coerce_count(index, "users", raw.get("users"))?,
        statuses: coerce_count(index, "statuses", raw.get("statuses"))?,
        updated_at: raw.get("updated_at").and_then(parse_timestamp),
    })
}

fn schema_error(index: usize, field: &str, value: Option<&Value>) -> Error {
    match value {
        None => Error::Schema(format!("record {index}: missing {field}")),
        Some(v) => Error::Schema(format!("record {index}: {field} is not an integer: {v}")),
    }
}

fn coerce_id(index: usize, value: Option<&Value>) -> Result<InstanceId> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Ok(InstanceId::from(s.as_str())),
        Some(Value::Number(n)) if n.is_i64() || n.is_u64() => Ok(InstanceId(n.to_string())),
        Some(v) => Err(Error::Schema(format!("record {index}: unusable id {v}"))),
        None => Err(Error::Schema(format!("record {index}: missing id"))),
    }
}

fn coerce_name(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Integers, integral floats and numeric strings; anything else is fatal.
fn coerce_count(index: usize, field: &str, value: Option<&Value>) -> Result<i64> {
    let coerced = match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    coerced.ok_or_else(|| schema_error(index, field, value))
}

/// RFC 3339 or a naive UTC layout; `None` for anything else.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let text = value.as_str()?.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| naive.and_utc())
}
