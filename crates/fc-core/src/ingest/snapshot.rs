//! Snapshot builder: one timeline row per surviving instance, all stamped
//! with the same minute.

use chrono::{DateTime, TimeDelta, Timelike, Utc};
use fc_common::{InstanceRecord, TimelineEntry};

/// Drop seconds and sub-second precision.
pub fn minute_floor(t: DateTime<Utc>) -> DateTime<Utc> {
    t - TimeDelta::seconds(i64::from(t.second()))
        - TimeDelta::nanoseconds(i64::from(t.nanosecond()))
}

/// Project records to timeline rows sharing `minute_floor(reference_time)`.
pub fn build_snapshot(records: &[InstanceRecord], reference_time: DateTime<Utc>) -> Vec<TimelineEntry> {
    let update_at = minute_floor(reference_time);
    records
        .iter()
        .map(|r| TimelineEntry {
            update_at,
            id: r.id.clone(),
            users: r.users,
            statuses: r.statuses,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use fc_common::InstanceId;

    #[test]
    fn test_minute_floor_zeroes_seconds_and_micros() {
        let t = Utc.with_ymd_and_hms(2026, 3, 1, 12, 34, 56).unwrap()
            + TimeDelta::microseconds(789_123);
        let floored = minute_floor(t);
        assert_eq!(floored, Utc.with_ymd_and_hms(2026, 3, 1, 12, 34, 0).unwrap());
        assert_eq!(floored.second(), 0);
        assert_eq!(floored.nanosecond(), 0);
    }

    #[test]
    fn test_snapshot_rows_share_one_timestamp() {
        let reference = Utc.with_ymd_and_hms(2026, 3, 1, 9, 15, 42).unwrap();
        let records: Vec<_> = ["a", "b", "c"]
            .iter()
            .enumerate()
            .map(|(i, id)| InstanceRecord {
                id: InstanceId::from(*id),
                name: String::new(),
                users: i as i64,
                statuses: 10 * i as i64,
                // Per-record times are ignored.
                updated_at: Some(reference + TimeDelta::minutes(i as i64 * 7)),
            })
            .collect();

        let snapshot = build_snapshot(&records, reference);
        assert_eq!(snapshot.len(), 3);
        let expected = Utc.with_ymd_and_hms(2026, 3, 1, 9, 15, 0).unwrap();
        assert!(snapshot.iter().all(|e| e.update_at == expected));
        assert_eq!(snapshot[2].id, InstanceId::from("c"));
        assert_eq!((snapshot[2].users, snapshot[2].statuses), (2, 20));
    }
}
