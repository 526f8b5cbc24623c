//! Whole-file Parquet tables behind the narrow `TableStore` interface.
//!
//! A save writes `<file>.tmp` next to the target, syncs it, then renames it
//! over the target. Any failure removes the temp file and leaves the target
//! exactly as it was.

use crate::error::StoreError;
use crate::schema::Columnar;
use fc_common::schema::{is_compatible, SCHEMA_VERSION_KEY};
use fc_common::{Error, Result, SCHEMA_VERSION};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::metadata::KeyValue;
use parquet::file::properties::WriterProperties;
use std::fs::{self, File};
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Load-everything / replace-everything storage of one table.
///
/// The pipeline merges through this interface only, so a store can move to
/// incremental or transactional storage without touching merge logic.
pub trait TableStore {
    type Row;

    /// Read every row currently stored.
    fn load(&self) -> Result<Vec<Self::Row>>;

    /// Replace the stored rows with `rows`.
    fn save(&self, rows: &[Self::Row]) -> Result<()>;
}

/// A store kept in a single Parquet file.
#[derive(Debug, Clone)]
pub struct ParquetTable<R> {
    path: PathBuf,
    _row: PhantomData<fn() -> R>,
}

impl<R: Columnar> ParquetTable<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _row: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write an empty table with the store's schema.
    ///
    /// Fails if the file already exists, so an existing history is never
    /// replaced by accident.
    pub fn create_empty(&self) -> Result<()> {
        if self.path.exists() {
            return Err(self.write_error(StoreError::AlreadyExists));
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.write_error(e.into()))?;
        }
        self.write_rows(&[]).map_err(|e| self.write_error(e))
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn read_rows(&self) -> std::result::Result<Vec<R>, StoreError> {
        let file = File::open(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::Missing,
            _ => StoreError::Io(e),
        })?;

        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
        let version = builder
            .metadata()
            .file_metadata()
            .key_value_metadata()
            .and_then(|kv| kv.iter().find(|entry| entry.key == SCHEMA_VERSION_KEY))
            .and_then(|entry| entry.value.clone());
        if !is_compatible(version.as_deref()) {
            return Err(StoreError::UnsupportedVersion {
                found: version.unwrap_or_default(),
                current: SCHEMA_VERSION.to_string(),
            });
        }

        let mut rows = Vec::new();
        for batch in builder.build()? {
            rows.extend(R::from_batch(&batch?)?);
        }
        Ok(rows)
    }

    fn write_rows(&self, rows: &[R]) -> std::result::Result<(), StoreError> {
        let batch = R::to_batch(rows)?;
        let tmp_path = self.tmp_path();

        let result = write_parquet(&tmp_path, &batch)
            .and_then(|()| fs::rename(&tmp_path, &self.path).map_err(StoreError::from));

        if result.is_err() && tmp_path.is_file() {
            if let Err(e) = fs::remove_file(&tmp_path) {
                warn!(path = %tmp_path.display(), error = %e, "failed to remove temp file");
            }
        }
        result
    }

    fn read_error(&self, err: StoreError) -> Error {
        Error::StorageRead {
            store: R::STORE.to_string(),
            path: self.path.clone(),
            reason: err.to_string(),
        }
    }

    fn write_error(&self, err: StoreError) -> Error {
        Error::StorageWrite {
            store: R::STORE.to_string(),
            path: self.path.clone(),
            reason: err.to_string(),
        }
    }
}

impl<R: Columnar> TableStore for ParquetTable<R> {
    type Row = R;

    fn load(&self) -> Result<Vec<R>> {
        let rows = self.read_rows().map_err(|e| self.read_error(e))?;
        debug!(store = R::STORE, path = %self.path.display(), rows = rows.len(), "store loaded");
        Ok(rows)
    }

    fn save(&self, rows: &[R]) -> Result<()> {
        self.write_rows(rows).map_err(|e| self.write_error(e))?;
        debug!(store = R::STORE, path = %self.path.display(), rows = rows.len(), "store saved");
        Ok(())
    }
}

fn writer_properties() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .set_key_value_metadata(Some(vec![KeyValue::new(
            SCHEMA_VERSION_KEY.to_string(),
            SCHEMA_VERSION.to_string(),
        )]))
        .build()
}

fn write_parquet(
    path: &Path,
    batch: &arrow::record_batch::RecordBatch,
) -> std::result::Result<(), StoreError> {
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(writer_properties()))?;
    writer.write(batch)?;
    let file = writer.into_inner()?;
    file.sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use fc_common::{DirectoryEntry, InstanceId, TimelineEntry};
    use tempfile::TempDir;

    fn entry(id: &str, users: i64) -> TimelineEntry {
        TimelineEntry {
            update_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            id: InstanceId::from(id),
            users,
            statuses: users * 10,
        }
    }

    #[test]
    fn test_save_then_load() {
        let tmp = TempDir::new().unwrap();
        let table = ParquetTable::<TimelineEntry>::new(tmp.path().join("timeline.parquet"));

        let rows = vec![entry("a", 1), entry("b", 2)];
        table.save(&rows).unwrap();
        assert_eq!(table.load().unwrap(), rows);
        assert!(!tmp.path().join("timeline.parquet.tmp").exists());
    }

    #[test]
    fn test_missing_store_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let table = ParquetTable::<DirectoryEntry>::new(tmp.path().join("directory.parquet"));

        let err = table.load().unwrap_err();
        assert!(matches!(err, Error::StorageRead { ref store, .. } if store == "directory"));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_garbage_file_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("timeline.parquet");
        fs::write(&path, b"not a parquet file").unwrap();

        let err = ParquetTable::<TimelineEntry>::new(&path).load().unwrap_err();
        assert!(matches!(err, Error::StorageRead { .. }));
    }

    #[test]
    fn test_failed_save_leaves_store_intact() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("timeline.parquet");
        let table = ParquetTable::<TimelineEntry>::new(&path);
        table.save(&[entry("a", 1)]).unwrap();
        let before = fs::read(&path).unwrap();

        // A directory squatting on the temp path makes the write fail.
        fs::create_dir(tmp.path().join("timeline.parquet.tmp")).unwrap();
        let err = table.save(&[entry("a", 1), entry("b", 2)]).unwrap_err();

        assert!(matches!(err, Error::StorageWrite { .. }));
        assert_eq!(fs::read(&path).unwrap(), before);
        assert_eq!(table.load().unwrap(), vec![entry("a", 1)]);
    }

    #[test]
    fn test_create_empty_refuses_existing() {
        let tmp = TempDir::new().unwrap();
        let table = ParquetTable::<DirectoryEntry>::new(tmp.path().join("nested/directory.parquet"));

        table.create_empty().unwrap();
        assert!(table.load().unwrap().is_empty());

        let err = table.create_empty().unwrap_err();
        assert!(matches!(err, Error::StorageWrite { .. }));
    }

    #[test]
    fn test_incompatible_version_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("directory.parquet");

        let batch = DirectoryEntry::to_batch(&[DirectoryEntry::new("a", "A")]).unwrap();
        let props = WriterProperties::builder()
            .set_key_value_metadata(Some(vec![KeyValue::new(
                SCHEMA_VERSION_KEY.to_string(),
                "9.0.0".to_string(),
            )]))
            .build();
        let mut writer =
            ArrowWriter::try_new(File::create(&path).unwrap(), batch.schema(), Some(props))
                .unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let err = ParquetTable::<DirectoryEntry>::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("unsupported schema version 9.0.0"));
    }
}
