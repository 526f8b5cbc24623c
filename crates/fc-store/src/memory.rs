//! In-memory table with the same contract as `ParquetTable`.

use crate::table::TableStore;
use fc_common::{Error, Result};
use std::cell::RefCell;
use std::path::PathBuf;

/// A table held in memory.
///
/// A table created with [`MemoryTable::missing`] fails `load` the way an
/// absent store file does; [`MemoryTable::read_only`] fails `save`.
#[derive(Debug)]
pub struct MemoryTable<R> {
    name: &'static str,
    rows: RefCell<Option<Vec<R>>>,
    writable: bool,
}

impl<R: Clone> MemoryTable<R> {
    pub fn new(name: &'static str, rows: Vec<R>) -> Self {
        Self {
            name,
            rows: RefCell::new(Some(rows)),
            writable: true,
        }
    }

    pub fn missing(name: &'static str) -> Self {
        Self {
            name,
            rows: RefCell::new(None),
            writable: true,
        }
    }

    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    /// Current contents, `None` for a missing table.
    pub fn snapshot(&self) -> Option<Vec<R>> {
        self.rows.borrow().clone()
    }

    fn location(&self) -> PathBuf {
        PathBuf::from(format!("memory://{}", self.name))
    }
}

impl<R: Clone> TableStore for MemoryTable<R> {
    type Row = R;

    fn load(&self) -> Result<Vec<R>> {
        self.rows.borrow().clone().ok_or_else(|| Error::StorageRead {
            store: self.name.to_string(),
            path: self.location(),
            reason: "store file does not exist".to_string(),
        })
    }

    fn save(&self, rows: &[R]) -> Result<()> {
        if !self.writable {
            return Err(Error::StorageWrite {
                store: self.name.to_string(),
                path: self.location(),
                reason: "table is read-only".to_string(),
            });
        }
        *self.rows.borrow_mut() = Some(rows.to_vec());
        Ok(())
    }
}
