//! Record filter.
//!
//! A record survives iff both counts are non-negative and its `updated_at`
//! is present and strictly inside the window around the reference time.
//! The reference time is an explicit input; it is never recomputed from the
//! filtered records.

use chrono::{DateTime, TimeDelta, Utc};
use fc_common::InstanceRecord;
use tracing::{debug, warn};

/// Open interval `(reference - half_width, reference + half_width)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalWindow {
    lower: DateTime<Utc>,
    upper: DateTime<Utc>,
}

impl TemporalWindow {
    pub fn around(reference_time: DateTime<Utc>, half_width: TimeDelta) -> Self {
        Self {
            lower: reference_time - half_width,
            upper: reference_time + half_width,
        }
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.lower < t && t < self.upper
    }
}

/// True when `record` passes every filter condition.
pub fn is_retained(record: &InstanceRecord, window: &TemporalWindow) -> bool {
    record.users >= 0
        && record.statuses >= 0
        && record.updated_at.is_some_and(|t| window.contains(t))
}

/// Keep the records that pass, in their original order.
pub fn filter_records(records: Vec<InstanceRecord>, window: &TemporalWindow) -> Vec<InstanceRecord> {
    let total = records.len();
    let retained: Vec<_> = records
        .into_iter()
        .filter(|r| is_retained(r, window))
        .collect();

    if retained.is_empty() {
        warn!(total, "filter retained no records; nothing new will be stored");
    } else {
        debug!(total, retained = retained.len(), "records filtered");
    }
    retained
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use fc_common::InstanceId;

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn window() -> TemporalWindow {
        TemporalWindow::around(reference(), TimeDelta::hours(1))
    }

    fn record(id: &str, users: i64, statuses: i64, offset_min: Option<i64>) -> InstanceRecord {
        InstanceRecord {
            id: InstanceId::from(id),
            name: id.to_uppercase(),
            users,
            statuses,
            updated_at: offset_min.map(|m| reference() + TimeDelta::minutes(m)),
        }
    }

    #[test]
    fn test_negative_counts_dropped() {
        assert!(!is_retained(&record("a", -1, 10, Some(0)), &window()));
        assert!(!is_retained(&record("a", 10, -1, Some(0)), &window()));
        assert!(is_retained(&record("a", 0, 0, Some(0)), &window()));
    }

    #[test]
    fn test_missing_timestamp_dropped() {
        assert!(!is_retained(&record("a", 1, 1, None), &window()));
    }

    #[test]
    fn test_window_is_exclusive_on_both_sides() {
        assert!(is_retained(&record("a", 1, 1, Some(-59)), &window()));
        assert!(is_retained(&record("a", 1, 1, Some(59)), &window()));
        assert!(!is_retained(&record("a", 1, 1, Some(-60)), &window()));
        assert!(!is_retained(&record("a", 1, 1, Some(60)), &window()));
        assert!(!is_retained(&record("a", 1, 1, Some(-600)), &window()));
        assert!(!is_retained(&record("a", 1, 1, Some(600)), &window()));
    }

    #[test]
    fn test_filter_preserves_order_and_is_idempotent() {
        let records = vec![
            record("c", 1, 1, Some(5)),
            record("x", -1, 1, Some(0)),
            record("a", 1, 1, Some(-5)),
            record("y", 1, 1, Some(300)),
            record("b", 1, 1, Some(0)),
        ];
        let once = filter_records(records, &window());
        let ids: Vec<_> = once.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["c", "a", "b"]);

        let twice = filter_records(once.clone(), &window());
        assert_eq!(twice, once);
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let out = filter_records(vec![record("a", -5, 1, Some(0))], &window());
        assert!(out.is_empty());
    }
}
