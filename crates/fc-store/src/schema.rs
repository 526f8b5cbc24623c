//! Arrow schemas for the two stores and row ↔ record-batch conversion.
//!
//! Timeline: `update_at: Timestamp(µs, UTC)`, `id: Utf8`, `users: Int64`,
//! `statuses: Int64`. Directory: `id: Utf8`, `name: Utf8`.
//!
//! Reading accepts older encodings of the same columns (any timestamp unit,
//! integer ids, narrower integer counts) and casts them to the canonical
//! types. Extra columns such as a dataframe index are ignored.

use crate::error::StoreError;
use arrow::array::{Array, ArrayRef, Int64Array, StringArray, TimestampMicrosecondArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Utc};
use fc_common::{DirectoryEntry, InstanceId, TimelineEntry};
use std::sync::Arc;

const UTC: &str = "UTC";

/// A row type that can be stored as an Arrow record batch.
pub trait Columnar: Sized {
    /// Store name used in logs and error messages.
    const STORE: &'static str;

    fn schema() -> SchemaRef;

    fn to_batch(rows: &[Self]) -> Result<RecordBatch, StoreError>;

    fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>, StoreError>;
}

fn timestamp_type() -> DataType {
    DataType::Timestamp(TimeUnit::Microsecond, Some(UTC.into()))
}

/// Schema of the append-only timeline store.
pub fn timeline_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("update_at", timestamp_type(), false),
        Field::new("id", DataType::Utf8, false),
        Field::new("users", DataType::Int64, false),
        Field::new("statuses", DataType::Int64, false),
    ]))
}

/// Schema of the latest-wins directory store.
pub fn directory_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("name", DataType::Utf8, true),
    ]))
}

#[derive(Debug, Clone, Copy)]
enum ColumnKind {
    Timestamp,
    Integer,
    Key,
    Text,
}

impl ColumnKind {
    fn target(self) -> DataType {
        match self {
            ColumnKind::Timestamp => timestamp_type(),
            ColumnKind::Integer => DataType::Int64,
            ColumnKind::Key | ColumnKind::Text => DataType::Utf8,
        }
    }

    fn accepts(self, data_type: &DataType) -> bool {
        let textual = matches!(data_type, DataType::Utf8 | DataType::LargeUtf8);
        match self {
            ColumnKind::Timestamp => matches!(data_type, DataType::Timestamp(_, _)),
            ColumnKind::Integer => data_type.is_integer(),
            ColumnKind::Key => textual || data_type.is_integer(),
            ColumnKind::Text => textual,
        }
    }
}

/// Fetch a column by name, cast to its canonical type.
fn read_column(batch: &RecordBatch, name: &str, kind: ColumnKind) -> Result<ArrayRef, StoreError> {
    let column = batch
        .column_by_name(name)
        .ok_or_else(|| StoreError::Corrupt(format!("missing column {name:?}")))?;

    let target = kind.target();
    if column.data_type() == &target {
        return Ok(column.clone());
    }
    if !kind.accepts(column.data_type()) {
        return Err(StoreError::Corrupt(format!(
            "column {name:?} has type {}, expected {target}",
            column.data_type()
        )));
    }
    Ok(cast(column, &target)?)
}

fn downcast<'a, T: 'static>(array: &'a ArrayRef, name: &str) -> Result<&'a T, StoreError> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        StoreError::Corrupt(format!(
            "column {name:?} has unexpected type {}",
            array.data_type()
        ))
    })
}

fn require_non_null(array: &ArrayRef, name: &str) -> Result<(), StoreError> {
    match array.null_count() {
        0 => Ok(()),
        n => Err(StoreError::Corrupt(format!("column {name:?} has {n} null values"))),
    }
}

impl Columnar for TimelineEntry {
    const STORE: &'static str = "timeline";

    fn schema() -> SchemaRef {
        timeline_schema()
    }

    fn to_batch(rows: &[Self]) -> Result<RecordBatch, StoreError> {
        let update_at = TimestampMicrosecondArray::from(
            rows.iter()
                .map(|r| r.update_at.timestamp_micros())
                .collect::<Vec<_>>(),
        )
        .with_timezone(UTC);
        let ids = StringArray::from(rows.iter().map(|r| r.id.as_str()).collect::<Vec<_>>());
        let users = Int64Array::from(rows.iter().map(|r| r.users).collect::<Vec<_>>());
        let statuses = Int64Array::from(rows.iter().map(|r| r.statuses).collect::<Vec<_>>());

        Ok(RecordBatch::try_new(
            Self::schema(),
            vec![
                Arc::new(update_at),
                Arc::new(ids),
                Arc::new(users),
                Arc::new(statuses),
            ],
        )?)
    }

    fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>, StoreError> {
        let update_at_col = read_column(batch, "update_at", ColumnKind::Timestamp)?;
        let id_col = read_column(batch, "id", ColumnKind::Key)?;
        let users_col = read_column(batch, "users", ColumnKind::Integer)?;
        let statuses_col = read_column(batch, "statuses", ColumnKind::Integer)?;

        for (col, name) in [
            (&update_at_col, "update_at"),
            (&id_col, "id"),
            (&users_col, "users"),
            (&statuses_col, "statuses"),
        ] {
            require_non_null(col, name)?;
        }

        let update_at = downcast::<TimestampMicrosecondArray>(&update_at_col, "update_at")?;
        let ids = downcast::<StringArray>(&id_col, "id")?;
        let users = downcast::<Int64Array>(&users_col, "users")?;
        let statuses = downcast::<Int64Array>(&statuses_col, "statuses")?;

        (0..batch.num_rows())
            .map(|i| {
                let micros = update_at.value(i);
                let update_at = DateTime::<Utc>::from_timestamp_micros(micros).ok_or_else(|| {
                    StoreError::Corrupt(format!("update_at out of range at row {i}: {micros}"))
                })?;
                Ok(TimelineEntry {
                    update_at,
                    id: InstanceId::from(ids.value(i)),
                    users: users.value(i),
                    statuses: statuses.value(i),
                })
            })
            .collect()
    }
}

impl Columnar for DirectoryEntry {
    const STORE: &'static str = "directory";

    fn schema() -> SchemaRef {
        directory_schema()
    }

    fn to_batch(rows: &[Self]) -> Result<RecordBatch, StoreError> {
        let ids = StringArray::from(rows.iter().map(|r| r.id.as_str()).collect::<Vec<_>>());
        let names = StringArray::from(rows.iter().map(|r| r.name.as_str()).collect::<Vec<_>>());
        Ok(RecordBatch::try_new(
            Self::schema(),
            vec![Arc::new(ids), Arc::new(names)],
        )?)
    }

    fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>, StoreError> {
        let id_col = read_column(batch, "id", ColumnKind::Key)?;
        let name_col = read_column(batch, "name", ColumnKind::Text)?;
        require_non_null(&id_col, "id")?;

        let ids = downcast::<StringArray>(&id_col, "id")?;
        let names = downcast::<StringArray>(&name_col, "name")?;

        Ok((0..batch.num_rows())
            .map(|i| DirectoryEntry {
                id: InstanceId::from(ids.value(i)),
                // A null name is kept as an empty string.
                name: if names.is_null(i) {
                    String::new()
                } else {
                    names.value(i).to_string()
                },
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Int32Array, TimestampNanosecondArray};
    use chrono::TimeZone;

    fn ts(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, h, m, 0).unwrap()
    }

    #[test]
    fn test_timeline_batch_matches_schema() {
        let rows = vec![
            TimelineEntry {
                update_at: ts(12, 0),
                id: InstanceId::from("a"),
                users: 10,
                statuses: 100,
            },
            TimelineEntry {
                update_at: ts(12, 0),
                id: InstanceId::from("b"),
                users: 0,
                statuses: 7,
            },
        ];
        let batch = TimelineEntry::to_batch(&rows).unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.schema(), timeline_schema());
        assert_eq!(TimelineEntry::from_batch(&batch).unwrap(), rows);
    }

    #[test]
    fn test_legacy_timeline_encoding_is_cast() {
        // Nanosecond naive timestamps, integer ids and 32-bit counts, plus
        // a stray index column.
        let schema = Arc::new(Schema::new(vec![
            Field::new(
                "update_at",
                DataType::Timestamp(TimeUnit::Nanosecond, None),
                false,
            ),
            Field::new("id", DataType::Int64, false),
            Field::new("users", DataType::Int32, false),
            Field::new("statuses", DataType::Int32, false),
            Field::new("__index_level_0__", DataType::Int64, true),
        ]));
        let nanos = ts(9, 30).timestamp_nanos_opt().unwrap();
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(TimestampNanosecondArray::from(vec![nanos])),
                Arc::new(Int64Array::from(vec![1234])),
                Arc::new(Int32Array::from(vec![5])),
                Arc::new(Int32Array::from(vec![50])),
                Arc::new(Int64Array::from(vec![0])),
            ],
        )
        .unwrap();

        let rows = TimelineEntry::from_batch(&batch).unwrap();
        assert_eq!(
            rows,
            vec![TimelineEntry {
                update_at: ts(9, 30),
                id: InstanceId::from("1234"),
                users: 5,
                statuses: 50,
            }]
        );
    }

    #[test]
    fn test_missing_column_is_corrupt() {
        let schema = Arc::new(Schema::new(vec![Field::new("id", DataType::Utf8, false)]));
        let batch =
            RecordBatch::try_new(schema, vec![Arc::new(StringArray::from(vec!["a"]))]).unwrap();
        let err = TimelineEntry::from_batch(&batch).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(ref m) if m.contains("update_at")));
    }

    #[test]
    fn test_textual_users_rejected() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("update_at", timestamp_type(), false),
            Field::new("id", DataType::Utf8, false),
            Field::new("users", DataType::Utf8, false),
            Field::new("statuses", DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(TimestampMicrosecondArray::from(vec![0]).with_timezone(UTC)),
                Arc::new(StringArray::from(vec!["a"])),
                Arc::new(StringArray::from(vec!["12"])),
                Arc::new(Int64Array::from(vec![1])),
            ],
        )
        .unwrap();
        assert!(matches!(
            TimelineEntry::from_batch(&batch),
            Err(StoreError::Corrupt(_))
        ));
    }

    #[test]
    fn test_directory_null_name_becomes_empty() {
        let batch = RecordBatch::try_new(
            directory_schema(),
            vec![
                Arc::new(StringArray::from(vec!["a", "b"])),
                Arc::new(StringArray::from(vec![Some("Alpha"), None])),
            ],
        )
        .unwrap();
        let rows = DirectoryEntry::from_batch(&batch).unwrap();
        assert_eq!(
            rows,
            vec![DirectoryEntry::new("a", "Alpha"), DirectoryEntry::new("b", "")]
        );
    }
}
